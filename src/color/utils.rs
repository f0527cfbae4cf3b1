use core::fmt::Write as _;

pub use smart_leds::hsv::hsv2rgb;

use crate::{color::Rgb, math8::blend8};

/// Fallback color for pixels a pattern cannot define
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Error returned for color strings that are not `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected \"#rrggbb\"")]
pub struct HexColorError(pub String);

/// Mirror the first half of the array around the center
pub fn mirror_half(leds: &mut [Rgb]) {
    let len = leds.len();
    let center = len.div_ceil(2);
    for i in 0..center {
        leds[len - 1 - i] = leds[i];
    }
}

/// Blend two RGB colors
///
/// `amount_of_b` is the blend factor: 0 = all `a`, 255 = all `b`.
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Parse a `#rrggbb` color string
pub fn parse_hex(s: &str) -> Result<Rgb, HexColorError> {
    let digits = s
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| HexColorError(s.to_owned()))?;
    let value = u32::from_str_radix(digits, 16).map_err(|_| HexColorError(s.to_owned()))?;
    Ok(rgb_from_u32(value))
}

/// Format a color as `#rrggbb`
pub fn format_hex(color: Rgb) -> String {
    let mut out = String::with_capacity(7);
    let _ = write!(out, "#{:02x}{:02x}{:02x}", color.r, color.g, color.b);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_hex() {
        assert_eq!(parse_hex("#ff8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(parse_hex("#0101FF"), Ok(Rgb::new(1, 1, 255)));
        assert_eq!(format_hex(Rgb::new(255, 128, 0)), "#ff8000");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(parse_hex("ff8000").is_err());
        assert!(parse_hex("#ff80").is_err());
        assert!(parse_hex("#gg8000").is_err());
        assert!(parse_hex("#+f8000").is_err());
    }
}
