pub mod clock;
pub mod color;
pub mod config;
pub mod control;
pub mod correction;
pub mod document;
pub mod error;
pub mod fps;
pub mod frame;
pub mod frame_scheduler;
pub mod math8;
pub mod pattern;
pub mod render_loop;
pub mod sink;

pub use clock::{Clock, ManualClock, Stopwatch, SystemClock};
pub use config::{Output, RunConfig};
pub use control::{ControlChannel, ControlReceiver, ControlSender, LoopControl};
pub use document::PatternSource;
pub use error::StartupError;
pub use frame::{FrameBuffer, TransmissionBuffer};
pub use frame_scheduler::FrameScheduler;
pub use pattern::{Pattern, PatternKind, PatternNode};
pub use render_loop::{ExitReason, LoopConfig, LoopExit, LoopState, RenderLoop};
pub use sink::{Sink, SinkError};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};
