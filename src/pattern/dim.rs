use serde::Deserialize;

use super::{Pattern, PatternNode};
use crate::{color::Rgb, math8::scale8};

/// Renders a child pattern scaled by `intensity` (255 = unchanged)
#[derive(Debug, Clone, Deserialize)]
pub struct Dim {
    child: Box<PatternNode>,
    intensity: u8,
}

impl Dim {
    pub fn new(child: PatternNode, intensity: u8) -> Self {
        Self {
            child: Box::new(child),
            intensity,
        }
    }
}

impl Pattern for Dim {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        self.child.render(frame, t_ms);
        if self.intensity == 255 {
            return;
        }
        for pixel in frame.iter_mut() {
            pixel.r = scale8(pixel.r, self.intensity);
            pixel.g = scale8(pixel.g, self.intensity);
            pixel.b = scale8(pixel.b, self.intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::StaticColor;

    #[test]
    fn halves_the_child() {
        let mut dim = Dim::new(StaticColor::new(Rgb::new(200, 100, 0)).into(), 127);
        let mut frame = [Rgb::default(); 2];
        dim.render(&mut frame, 0);
        assert_eq!(frame, [Rgb::new(100, 50, 0); 2]);
    }
}
