//! HSV gradients in 8.8 fixed point

use super::{Hsv, Rgb, hsv2rgb};

/// Which way around the hue wheel a gradient travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueDirection {
    Forward,
    Backward,
}

/// Fill `leds` with a gradient from `start` at the first pixel to `end` at
/// the last one
///
/// Saturation and value are interpolated linearly. A black or grey endpoint
/// takes the other endpoint's hue so the fade does not sweep through
/// unrelated colors.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fill_hsv_gradient(leds: &mut [Rgb], start: Hsv, end: Hsv, direction: HueDirection) {
    let (mut start, mut end) = (start, end);
    if end.val == 0 || end.sat == 0 {
        end.hue = start.hue;
    }
    if start.val == 0 || start.sat == 0 {
        start.hue = end.hue;
    }

    let hue_distance: i32 = match direction {
        HueDirection::Forward => i32::from(end.hue.wrapping_sub(start.hue)),
        HueDirection::Backward => -i32::from(start.hue.wrapping_sub(end.hue)),
    };
    let sat_distance = i32::from(end.sat) - i32::from(start.sat);
    let val_distance = i32::from(end.val) - i32::from(start.val);

    let steps = i32::try_from(leds.len().saturating_sub(1).max(1)).unwrap_or(i32::MAX);
    let at = |origin: u8, distance: i32, i: i32| -> i32 {
        ((i32::from(origin) << 8) + (distance << 8) * i / steps) >> 8
    };

    for (i, led) in leds.iter_mut().enumerate() {
        let i = i32::try_from(i).unwrap_or(i32::MAX);
        *led = hsv2rgb(Hsv {
            hue: at(start.hue, hue_distance, i).rem_euclid(256) as u8,
            sat: at(start.sat, sat_distance, i).clamp(0, 255) as u8,
            val: at(start.val, val_distance, i).clamp(0, 255) as u8,
        });
    }
}

/// Fill `leds` through three stops: `stops[0]` at the first pixel,
/// `stops[1]` in the middle and `stops[2]` at the last pixel
pub fn fill_three_stop_gradient(leds: &mut [Rgb], stops: [Hsv; 3], direction: HueDirection) {
    if leds.is_empty() {
        return;
    }
    let half = leds.len() / 2;
    let last = leds.len() - 1;

    fill_hsv_gradient(&mut leds[..=half], stops[0], stops[1], direction);
    if last > half {
        fill_hsv_gradient(&mut leds[half..], stops[1], stops[2], direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn hsv(hue: u8) -> Hsv {
        Hsv {
            hue,
            sat: 255,
            val: 255,
        }
    }

    #[test]
    fn endpoints_hit_their_stops() {
        let mut leds = [Rgb::default(); 9];
        fill_three_stop_gradient(&mut leds, [hsv(0), hsv(60), hsv(120)], HueDirection::Forward);
        assert_eq!(leds[0], hsv2rgb(hsv(0)));
        assert_eq!(leds[4], hsv2rgb(hsv(60)));
        assert_eq!(leds[8], hsv2rgb(hsv(120)));
    }

    #[test]
    fn backward_wraps_through_zero() {
        let mut leds = [Rgb::default(); 3];
        fill_hsv_gradient(&mut leds, hsv(10), hsv(246), HueDirection::Backward);
        assert_eq!(leds[1], hsv2rgb(hsv(0)));
        assert_eq!(leds[2], hsv2rgb(hsv(246)));
    }

    #[test]
    fn single_pixel_takes_the_first_stop() {
        let mut leds = [Rgb::default(); 1];
        fill_three_stop_gradient(&mut leds, [hsv(30), hsv(90), hsv(150)], HueDirection::Forward);
        assert_eq!(leds[0], hsv2rgb(hsv(30)));
    }

    #[test]
    fn black_endpoint_keeps_the_hue() {
        let black = Hsv {
            hue: 200,
            sat: 255,
            val: 0,
        };
        let mut leds = [Rgb::default(); 3];
        fill_hsv_gradient(&mut leds, hsv(0), black, HueDirection::Forward);
        assert_eq!(
            leds[1],
            hsv2rgb(Hsv {
                hue: 0,
                sat: 255,
                val: 127
            })
        );
    }
}
