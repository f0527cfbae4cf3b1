//! Flow pattern
//!
//! Three layers of 1D value noise drift along the strip at different speeds
//! and directions; their blend picks a position in a palette.

use serde::Deserialize;

use super::Pattern;
use crate::{
    color::{Rgb, blend_colors, rgb_from_u32},
    math8::{blend8, ease_in_out_quad, scale8},
};

macro_rules! hex_palette {
    ($($color:expr),* $(,)?) => {
        [$(rgb_from_u32($color)),*]
    };
}

#[allow(clippy::unreadable_literal)]
const AURORA: [Rgb; 6] = hex_palette![
    0x002EB8, // deep blue
    0x00FFD4, // teal
    0x14FF78, // green
    0x00C8FF, // cyan
    0x8800FF, // violet
    0xFF0090, // pink
];

#[allow(clippy::unreadable_literal)]
const LAVA_LAMP: [Rgb; 5] = hex_palette![
    0x3C0014, // dark magenta
    0xD10038, // deep red
    0xFF5000, // orange
    0xFF972E, // yellow
    0xF2039F, // purple
];

/// Layer periods in milliseconds: base, detail, shimmer
const LAYER_PERIODS_MS: [u64; 3] = [8_000, 5_000, 13_000];

/// Noise cell size bounds in pixels, per layer
const CELL_MIN: [u32; 3] = [12, 6, 18];
const CELL_MAX: [u32; 3] = [40, 18, 60];
/// Strip length divisor giving the cell size, per layer
const CELL_DIVISOR: [u32; 3] = [6, 12, 4];

/// Layer weights out of 256
const LAYER_WEIGHTS: [u16; 3] = [128, 77, 51];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPalette {
    /// Cool blue, teal and violet
    #[default]
    Aurora,
    /// Warm red, orange and purple
    LavaLamp,
}

impl FlowPalette {
    const fn colors(self) -> &'static [Rgb] {
        match self {
            Self::Aurora => &AURORA,
            Self::LavaLamp => &LAVA_LAMP,
        }
    }
}

/// Palette flow driven by layered value noise
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FlowPattern {
    palette: FlowPalette,
}

impl FlowPattern {
    pub const fn new(palette: FlowPalette) -> Self {
        Self { palette }
    }

    /// SplitMix64 finalizer folded down to 32 bits
    #[allow(clippy::cast_possible_truncation)]
    const fn hash(x: u64) -> u32 {
        let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        (z ^ (z >> 31)) as u32
    }

    /// Smoothed noise at a 16.16 fixed-point position, 0-255
    #[allow(clippy::cast_possible_truncation)]
    fn value_noise(pos: u64) -> u8 {
        let cell = pos >> 16;
        let frac = ((pos >> 8) & 0xFF) as u8;
        let v0 = (Self::hash(cell) & 0xFF) as u8;
        let v1 = (Self::hash(cell.wrapping_add(1)) & 0xFF) as u8;
        blend8(v0, v1, ease_in_out_quad(frac))
    }

    /// Blend of the three noise layers at pixel `i`
    #[allow(clippy::cast_possible_truncation)]
    fn noise_at(i: u32, len: u32, t_ms: u32) -> u8 {
        let time = u64::from(t_ms);
        let mut sum: u16 = 0;
        for layer in 0..3 {
            let cell = (len / CELL_DIVISOR[layer]).clamp(CELL_MIN[layer], CELL_MAX[layer]);
            let x = (u64::from(i) << 16) / u64::from(cell);
            let phase = (time << 16) / LAYER_PERIODS_MS[layer];
            // Layers move in different directions for parallax
            let pos = match layer {
                0 => x.wrapping_add(phase),
                1 => x.wrapping_sub(phase),
                _ => x.wrapping_add(phase.wrapping_mul(2)),
            };
            let noise = u16::from(Self::value_noise(pos));
            sum += (noise * LAYER_WEIGHTS[layer]) >> 8;
        }
        sum.min(255) as u8
    }

    /// Sample the palette at `t` (0-255) with blending between entries
    #[allow(clippy::cast_possible_truncation)]
    fn sample(palette: &[Rgb], t: u8) -> Rgb {
        let segments = palette.len().saturating_sub(1);
        if segments == 0 {
            return palette.first().copied().unwrap_or_default();
        }
        let scaled = usize::from(t) * segments;
        let segment = (scaled >> 8).min(segments - 1);
        let local = (scaled & 0xFF) as u8;
        blend_colors(palette[segment], palette[segment + 1], local)
    }
}

impl Pattern for FlowPattern {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        let len = u32::try_from(frame.len()).unwrap_or(u32::MAX);
        let palette = self.palette.colors();

        for (i, pixel) in frame.iter_mut().enumerate() {
            let i = u32::try_from(i).unwrap_or(u32::MAX);
            let noise = Self::noise_at(i, len, t_ms);
            let base = Self::sample(palette, noise);
            // 75%-100% brightness follows the noise
            let level = scale8(noise, 64).saturating_add(191);
            *pixel = Rgb {
                r: scale8(base.r, level),
                g: scale8(base.g, level),
                b: scale8(base.b, level),
            };
        }
    }
}
