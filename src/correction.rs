//! Device color correction
//!
//! Multiplicative per-channel scaling applied by hardware sinks right before
//! encoding. The factors combine the strip's white point (derived from a
//! color temperature) with its overall intensity.

use crate::color::{Rgb, kelvin_to_rgb};
use crate::math8::scale8;

/// Temperature value that disables white point correction
pub const NEUTRAL_TEMPERATURE: u16 = 0;

/// Per-channel correction factors (255 = unchanged)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCorrection {
    factors: Rgb,
}

impl ColorCorrection {
    /// Correction that leaves colors unchanged
    pub const IDENTITY: Self = Self::from_factors(Rgb {
        r: 255,
        g: 255,
        b: 255,
    });

    pub const fn from_factors(factors: Rgb) -> Self {
        Self { factors }
    }

    /// Build the correction for a strip `intensity` (0-255) and color
    /// `temperature` in Kelvin
    pub fn new(intensity: u8, temperature: u16) -> Self {
        let white = if temperature == NEUTRAL_TEMPERATURE {
            Self::IDENTITY.factors
        } else {
            kelvin_to_rgb(temperature)
        };
        Self::from_factors(Rgb {
            r: scale8(white.r, intensity),
            g: scale8(white.g, intensity),
            b: scale8(white.b, intensity),
        })
    }

    pub const fn factors(self) -> Rgb {
        self.factors
    }

    pub const fn is_identity(self) -> bool {
        self.factors.r == 255 && self.factors.g == 255 && self.factors.b == 255
    }

    #[inline]
    pub const fn apply(self, color: Rgb) -> Rgb {
        Rgb {
            r: scale8(color.r, self.factors.r),
            g: scale8(color.g, self.factors.g),
            b: scale8(color.b, self.factors.b),
        }
    }
}
