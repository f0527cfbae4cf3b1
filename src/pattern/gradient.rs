//! Linear two-color gradient

use serde::Deserialize;

use super::Pattern;
use crate::{
    color::{Rgb, blend_colors},
    document::de_color,
};

/// Blends from `left` at pixel 0 to `right` at the last pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Gradient {
    #[serde(deserialize_with = "de_color")]
    left: Rgb,
    #[serde(deserialize_with = "de_color")]
    right: Rgb,
}

impl Gradient {
    pub const fn new(left: Rgb, right: Rgb) -> Self {
        Self { left, right }
    }
}

impl Pattern for Gradient {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, frame: &mut [Rgb], _t_ms: u32) {
        let last = frame.len().saturating_sub(1);
        if last == 0 {
            frame.fill(self.left);
            return;
        }

        for (i, pixel) in frame.iter_mut().enumerate() {
            let amount = (i * 255 / last) as u8;
            *pixel = blend_colors(self.left, self.right, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_match_the_configured_colors() {
        let left = Rgb::new(255, 0, 0);
        let right = Rgb::new(0, 0, 255);
        let mut frame = [Rgb::default(); 5];
        Gradient::new(left, right).render(&mut frame, 0);
        assert_eq!(frame[0], left);
        assert_eq!(frame[4], right);
        assert!(frame[2].r > 0 && frame[2].b > 0);
    }

    #[test]
    fn single_pixel_renders_left() {
        let mut frame = [Rgb::default(); 1];
        Gradient::new(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)).render(&mut frame, 0);
        assert_eq!(frame[0], Rgb::new(1, 2, 3));
    }
}
