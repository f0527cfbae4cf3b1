//! Rainbow cycling pattern
//!
//! The strip shows a three-stop band of the hue wheel that rotates once per
//! cycle.

use serde::Deserialize;

use super::Pattern;
use crate::color::{Hsv, HueDirection, Rgb, fill_three_stop_gradient, mirror_half};

const DEFAULT_CYCLE_MS: u32 = 12_000;
const DEFAULT_HUE_SPAN: u8 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainbowDirection {
    #[default]
    Forward,
    Backward,
    /// Forward on the first half, mirrored onto the second
    Mirrored,
}

/// Hue-cycling rainbow
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RainbowPattern {
    /// Duration of one complete hue rotation
    cycle_ms: u32,
    /// Hue distance covered from the first to the last pixel
    span: u8,
    saturation: u8,
    value: u8,
    direction: RainbowDirection,
}

impl Default for RainbowPattern {
    fn default() -> Self {
        Self {
            cycle_ms: DEFAULT_CYCLE_MS,
            span: DEFAULT_HUE_SPAN,
            saturation: 255,
            value: 255,
            direction: RainbowDirection::Forward,
        }
    }
}

impl RainbowPattern {
    #[must_use]
    pub fn with_direction(mut self, direction: RainbowDirection) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_cycle_ms(mut self, cycle_ms: u32) -> Self {
        self.cycle_ms = cycle_ms;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: u8) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_saturation(mut self, saturation: u8) -> Self {
        self.saturation = saturation;
        self
    }

    pub const fn direction(&self) -> RainbowDirection {
        self.direction
    }

    #[allow(clippy::cast_possible_truncation)]
    fn base_hue(&self, t_ms: u32) -> u8 {
        let cycle = u64::from(self.cycle_ms.max(1));
        let progress = u64::from(t_ms) % cycle;
        ((progress * 256) / cycle) as u8
    }

    fn stop(&self, hue: u8) -> Hsv {
        Hsv {
            hue,
            sat: self.saturation,
            val: self.value,
        }
    }

    /// Three hue stops spread over `span`, starting at `base_hue`
    fn fill(&self, leds: &mut [Rgb], base_hue: u8, direction: HueDirection) {
        let half_span = self.span / 2;
        let step = |hue: u8, by: u8| match direction {
            HueDirection::Forward => hue.wrapping_add(by),
            HueDirection::Backward => hue.wrapping_sub(by),
        };
        let stops = [
            self.stop(base_hue),
            self.stop(step(base_hue, half_span)),
            self.stop(step(base_hue, self.span)),
        ];
        fill_three_stop_gradient(leds, stops, direction);
    }
}

impl Pattern for RainbowPattern {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        let base_hue = self.base_hue(t_ms);
        match self.direction {
            RainbowDirection::Forward => self.fill(frame, base_hue, HueDirection::Forward),
            RainbowDirection::Backward => self.fill(frame, base_hue, HueDirection::Backward),
            RainbowDirection::Mirrored => {
                let half = frame.len().div_ceil(2);
                self.fill(&mut frame[..half], base_hue, HueDirection::Forward);
                mirror_half(frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsv2rgb;

    #[test]
    fn hue_returns_after_a_full_cycle() {
        let mut rainbow = RainbowPattern::default().with_cycle_ms(1000);
        let mut first = [Rgb::default(); 8];
        let mut later = [Rgb::default(); 8];
        rainbow.render(&mut first, 250);
        rainbow.render(&mut later, 1250);
        assert_eq!(first, later);
    }

    #[test]
    fn mirrored_is_symmetric() {
        let mut rainbow = RainbowPattern::default().with_direction(RainbowDirection::Mirrored);
        let mut frame = [Rgb::default(); 7];
        rainbow.render(&mut frame, 4321);
        for i in 0..frame.len() {
            assert_eq!(frame[i], frame[frame.len() - 1 - i]);
        }
    }

    #[test]
    fn stops_land_on_first_middle_and_last_pixel() {
        let mut rainbow = RainbowPattern::default();
        let mut frame = [Rgb::default(); 5];
        rainbow.render(&mut frame, 0);

        let at = |hue| {
            hsv2rgb(Hsv {
                hue,
                sat: 255,
                val: 255,
            })
        };
        assert_eq!(frame[0], at(0));
        assert_eq!(frame[2], at(DEFAULT_HUE_SPAN / 2));
        assert_eq!(frame[4], at(DEFAULT_HUE_SPAN));
    }

    #[test]
    fn backward_walks_the_wheel_the_other_way() {
        let mut rainbow = RainbowPattern::default().with_direction(RainbowDirection::Backward);
        let mut frame = [Rgb::default(); 5];
        rainbow.render(&mut frame, 0);

        assert_eq!(
            frame[4],
            hsv2rgb(Hsv {
                hue: 0u8.wrapping_sub(DEFAULT_HUE_SPAN),
                sat: 255,
                val: 255,
            })
        );
    }

    #[test]
    fn zero_cycle_is_treated_as_one_millisecond() {
        let mut rainbow = RainbowPattern::default().with_cycle_ms(0);
        let mut frame = [Rgb::default(); 3];
        rainbow.render(&mut frame, 12345);
    }
}
