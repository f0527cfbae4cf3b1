use serde::Deserialize;

use super::{Pattern, PatternNode};
use crate::color::Rgb;

/// Rotates a child pattern along the strip
///
/// Pixels leaving one end re-enter at the other. Negative speeds move
/// toward pixel 0.
#[derive(Debug, Clone, Deserialize)]
pub struct Scroll {
    child: Box<PatternNode>,
    pixels_per_second: i32,
}

impl Scroll {
    pub fn new(child: PatternNode, pixels_per_second: i32) -> Self {
        Self {
            child: Box::new(child),
            pixels_per_second,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn offset(&self, len: usize, t_ms: u32) -> usize {
        let travelled = i64::from(t_ms) * i64::from(self.pixels_per_second) / 1000;
        let len = i64::try_from(len).unwrap_or(i64::MAX);
        travelled.rem_euclid(len) as usize
    }
}

impl Pattern for Scroll {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        self.child.render(frame, t_ms);
        if frame.is_empty() {
            return;
        }
        let offset = self.offset(frame.len(), t_ms);
        frame.rotate_right(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Gradient;

    fn marker() -> PatternNode {
        Gradient::new(Rgb::new(255, 0, 0), Rgb::new(0, 0, 0)).into()
    }

    #[test]
    fn moves_forward_one_pixel_per_interval() {
        let mut scroll = Scroll::new(marker(), 2);
        let mut frame = [Rgb::default(); 4];
        scroll.render(&mut frame, 500);
        assert_eq!(frame[1], Rgb::new(255, 0, 0));
    }

    #[test]
    fn negative_speed_wraps_to_the_end() {
        let mut scroll = Scroll::new(marker(), -1);
        let mut frame = [Rgb::default(); 4];
        scroll.render(&mut frame, 1000);
        assert_eq!(frame[3], Rgb::new(255, 0, 0));
    }
}
