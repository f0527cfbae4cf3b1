//! Static color fill

use serde::Deserialize;

use super::Pattern;
use crate::{color::Rgb, document::de_color};

/// Fills every pixel with one color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StaticColor {
    #[serde(deserialize_with = "de_color")]
    color: Rgb,
}

impl StaticColor {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Pattern for StaticColor {
    fn render(&mut self, frame: &mut [Rgb], _t_ms: u32) {
        frame.fill(self.color);
    }
}
