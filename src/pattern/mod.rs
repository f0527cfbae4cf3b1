//! Pattern system
//!
//! A pattern fills a frame with colors for a timestamp in milliseconds.
//! Built-in patterns are collected in [`PatternKind`] so a whole pattern
//! tree is dispatched without trait objects; composite patterns own their
//! children through [`PatternNode`].

mod dim;
mod flow;
mod gradient;
mod looped;
mod rainbow;
mod scroll;
mod static_color;

pub use dim::Dim;
pub use flow::{FlowPalette, FlowPattern};
pub use gradient::Gradient;
pub use looped::Loop;
pub use rainbow::{RainbowDirection, RainbowPattern};
pub use scroll::Scroll;
pub use static_color::StaticColor;

use serde::Deserialize;

use crate::color::Rgb;

/// Evaluates pixel colors at a point in animation time
///
/// Implementations must write every pixel of `frame` on each call, must not
/// read its previous contents and must not block. `t_ms` is non-decreasing
/// between calls except when it wraps from `u32::MAX` back to 0. A pattern
/// that cannot define a color for some pixel writes [`BLACK`](crate::color::BLACK)
/// there instead of failing.
pub trait Pattern {
    /// Render the frame at `t_ms` milliseconds of animation time
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32);
}

impl<P: Pattern + ?Sized> Pattern for Box<P> {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        (**self).render(frame, t_ms);
    }
}

impl<P: Pattern + ?Sized> Pattern for &mut P {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        (**self).render(frame, t_ms);
    }
}

/// Built-in pattern variants, tagged by `_type` in documents
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_type")]
pub enum PatternKind {
    /// Single solid color
    Color(StaticColor),
    /// Linear blend between two colors
    Gradient(Gradient),
    /// Hue-cycling rainbow
    Rainbow(RainbowPattern),
    /// Layered noise flowing through a palette
    Flow(FlowPattern),
    /// Child pattern scaled down in intensity
    Dim(Dim),
    /// Child pattern rotated along the strip
    Scroll(Scroll),
    /// Children shown in turn with cross-fades
    Loop(Loop),
}

impl PatternKind {
    /// Name used as the `_type` tag
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Color(_) => "Color",
            Self::Gradient(_) => "Gradient",
            Self::Rainbow(_) => "Rainbow",
            Self::Flow(_) => "Flow",
            Self::Dim(_) => "Dim",
            Self::Scroll(_) => "Scroll",
            Self::Loop(_) => "Loop",
        }
    }
}

impl Pattern for PatternKind {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        match self {
            Self::Color(pattern) => pattern.render(frame, t_ms),
            Self::Gradient(pattern) => pattern.render(frame, t_ms),
            Self::Rainbow(pattern) => pattern.render(frame, t_ms),
            Self::Flow(pattern) => pattern.render(frame, t_ms),
            Self::Dim(pattern) => pattern.render(frame, t_ms),
            Self::Scroll(pattern) => pattern.render(frame, t_ms),
            Self::Loop(pattern) => pattern.render(frame, t_ms),
        }
    }
}

/// A node of a pattern tree
///
/// Deserializes from either a `"#rrggbb"` string (a solid color) or a
/// `_type`-tagged object, see [`crate::document`].
#[derive(Debug, Clone)]
pub struct PatternNode(pub PatternKind);

impl PatternNode {
    pub const fn kind(&self) -> &PatternKind {
        &self.0
    }
}

impl Pattern for PatternNode {
    fn render(&mut self, frame: &mut [Rgb], t_ms: u32) {
        self.0.render(frame, t_ms);
    }
}

impl From<PatternKind> for PatternNode {
    fn from(kind: PatternKind) -> Self {
        Self(kind)
    }
}

macro_rules! impl_node_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for PatternNode {
                fn from(pattern: $ty) -> Self {
                    Self(PatternKind::$variant(pattern))
                }
            }
        )*
    };
}

impl_node_from!(
    Color(StaticColor),
    Gradient(Gradient),
    Rainbow(RainbowPattern),
    Flow(FlowPattern),
    Dim(Dim),
    Scroll(Scroll),
    Loop(Loop),
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;

    fn every_builtin() -> Vec<PatternNode> {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        vec![
            StaticColor::new(red).into(),
            Gradient::new(red, blue).into(),
            RainbowPattern::default().into(),
            RainbowPattern::default()
                .with_direction(RainbowDirection::Mirrored)
                .into(),
            FlowPattern::new(FlowPalette::Aurora).into(),
            FlowPattern::new(FlowPalette::LavaLamp).into(),
            Dim::new(RainbowPattern::default().into(), 128).into(),
            Scroll::new(Gradient::new(red, blue).into(), -7).into(),
            Loop::new(
                vec![StaticColor::new(red).into(), RainbowPattern::default().into()],
                1000,
                500,
            )
            .into(),
        ]
    }

    #[test]
    fn builtins_survive_the_millisecond_wrap() {
        let near_wrap = [u32::MAX - 2000, u32::MAX - 1000, u32::MAX, 0, 1000, 2000];
        for mut pattern in every_builtin() {
            for len in [0usize, 1, 2, 5, 44] {
                for t in (0..10u32).map(|k| k * 1000).chain(near_wrap) {
                    let mut frame = vec![Rgb::new(1, 2, 3); len];
                    pattern.render(&mut frame, t);
                    let mut again = vec![Rgb::new(9, 9, 9); len];
                    pattern.render(&mut again, t);
                    assert_eq!(frame, again, "{} is not a pure function of t", pattern.kind().name());
                }
            }
        }
    }

    #[test]
    fn boxed_patterns_delegate() {
        let mut pattern: Box<dyn Pattern> = Box::new(StaticColor::new(Rgb::new(1, 1, 1)));
        let mut frame = [BLACK; 2];
        pattern.render(&mut frame, 0);
        assert_eq!(frame, [Rgb::new(1, 1, 1); 2]);
    }
}
