mod gradient;
mod kelvin;
mod utils;

pub use gradient::{HueDirection, fill_hsv_gradient, fill_three_stop_gradient};
pub use kelvin::kelvin_to_rgb;
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use utils::{
    BLACK, HexColorError, blend_colors, format_hex, hsv2rgb, mirror_half, parse_hex,
    rgb_from_u32,
};

pub type Rgb = RGB8;
pub type Hsv = HSV;
