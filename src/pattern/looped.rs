//! Loop pattern
//!
//! Shows each child for `show_ms`, then cross-fades into the next one over
//! `transition_ms`. After the last child the sequence starts over.

use embassy_time::Duration;
use serde::Deserialize;

use super::{Pattern, PatternNode};
use crate::{
    color::{BLACK, Rgb, blend_colors},
    math8::progress8,
};

const DEFAULT_SHOW_MS: u32 = 1_000;
const DEFAULT_TRANSITION_MS: u32 = 500;

const fn default_show_ms() -> u32 {
    DEFAULT_SHOW_MS
}

const fn default_transition_ms() -> u32 {
    DEFAULT_TRANSITION_MS
}

#[derive(Debug, Clone, Deserialize)]
pub struct Loop {
    patterns: Vec<PatternNode>,
    #[serde(default = "default_show_ms")]
    show_ms: u32,
    #[serde(default = "default_transition_ms")]
    transition_ms: u32,
    /// Frame of the incoming pattern during a cross-fade
    #[serde(skip)]
    incoming: Vec<Rgb>,
}

impl Loop {
    pub fn new(patterns: Vec<PatternNode>, show_ms: u32, transition_ms: u32) -> Self {
        Self {
            patterns,
            show_ms,
            transition_ms,
            incoming: Vec::new(),
        }
    }

    pub fn patterns(&self) -> &[PatternNode] {
        &self.patterns
    }

    /// Show time in milliseconds, zero is treated as one
    fn show(&self) -> u64 {
        u64::from(self.show_ms.max(1))
    }

    /// Index of the current child and milliseconds spent in its period
    #[allow(clippy::cast_possible_truncation)]
    fn position(&self, t_ms: u32) -> (usize, u64) {
        let period = self.show() + u64::from(self.transition_ms);
        let cycle = period * self.patterns.len() as u64;
        let at = u64::from(t_ms) % cycle;
        ((at / period) as usize, at % period)
    }
}

impl Pattern for Loop {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        let count = self.patterns.len();
        if count == 0 {
            frame.fill(BLACK);
            return;
        }

        let (index, within) = self.position(t_ms);
        self.patterns[index].render(frame, t_ms);

        let show = self.show();
        if count == 1 || within < show {
            return;
        }

        let progress = progress8(
            Duration::from_millis(within - show),
            Duration::from_millis(u64::from(self.transition_ms)),
        );
        self.incoming.clear();
        self.incoming.resize(frame.len(), BLACK);
        self.patterns[(index + 1) % count].render(&mut self.incoming, t_ms);
        for (pixel, next) in frame.iter_mut().zip(&self.incoming) {
            *pixel = blend_colors(*pixel, *next, progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::StaticColor;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    fn red_then_blue() -> Loop {
        Loop::new(
            vec![StaticColor::new(RED).into(), StaticColor::new(BLUE).into()],
            1000,
            500,
        )
    }

    fn render_at(pattern: &mut Loop, t_ms: u32) -> Rgb {
        let mut frame = [Rgb::default(); 3];
        pattern.render(&mut frame, t_ms);
        frame[0]
    }

    #[test]
    fn shows_each_child_in_turn() {
        let mut pattern = red_then_blue();
        assert_eq!(render_at(&mut pattern, 0), RED);
        assert_eq!(render_at(&mut pattern, 999), RED);
        assert_eq!(render_at(&mut pattern, 1500), BLUE);
        assert_eq!(render_at(&mut pattern, 3000), RED);
    }

    #[test]
    fn cross_fades_between_children() {
        let mut pattern = red_then_blue();
        let mid = render_at(&mut pattern, 1250);
        assert!(mid.r > 0 && mid.r < 255);
        assert!(mid.b > 0 && mid.b < 255);
    }

    #[test]
    fn zero_show_time_starts_on_the_child() {
        let mut pattern = Loop::new(
            vec![StaticColor::new(RED).into(), StaticColor::new(BLUE).into()],
            0,
            0,
        );
        assert_eq!(render_at(&mut pattern, 0), RED);
        assert_eq!(render_at(&mut pattern, 1), BLUE);
        assert_eq!(render_at(&mut pattern, 2), RED);
    }

    #[test]
    fn empty_loop_renders_black() {
        let mut pattern = Loop::new(Vec::new(), 1000, 500);
        let mut frame = [RED; 2];
        pattern.render(&mut frame, 10);
        assert_eq!(frame, [BLACK; 2]);
    }
}
