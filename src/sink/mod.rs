//! Output sinks
//!
//! A sink is where packed frames end up: a physical LED bus or a terminal
//! preview. The render loop is generic over [`Sink`] and only ever uses the
//! three operations below.

mod apa102;
mod retry;
mod spidev;
mod terminal;

pub use apa102::{Apa102Config, Apa102Sink};
pub use retry::{RetryPolicy, Retrying};
pub use spidev::{DEFAULT_MAX_TRANSFER, SpidevBus, SpidevError, open_spidev, spidev_path};
pub use terminal::TerminalSink;

use core::convert::Infallible;
use std::io;

/// Errors raised while delivering a frame or releasing a sink
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("bus error: {0}")]
    Bus(String),

    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("sink is closed")]
    Closed,
}

impl SinkError {
    pub fn bus(msg: impl Into<String>) -> Self {
        Self::Bus(msg.into())
    }

    /// Whether retrying the same write may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ),
            Self::Bus(_) => true,
            Self::LengthMismatch { .. } | Self::Closed => false,
        }
    }
}

impl From<Infallible> for SinkError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

/// Output target for packed frames
///
/// Implement this trait to support a new kind of output.
pub trait Sink {
    /// Number of pixels the sink drives
    ///
    /// Fixed for the lifetime of the sink.
    fn pixel_count(&self) -> usize;

    /// Deliver one frame of `R,G,B` bytes, 3 per pixel
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Flush and release the output
    ///
    /// Called exactly once when the render loop terminates.
    fn close(&mut self) -> Result<(), SinkError>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn pixel_count(&self) -> usize {
        (**self).pixel_count()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn pixel_count(&self) -> usize {
        (**self).pixel_count()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(bytes)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

/// Check that `bytes` holds exactly one frame for `pixels` pixels
pub(crate) fn expect_frame_len(bytes: &[u8], pixels: usize) -> Result<(), SinkError> {
    let expected = pixels * crate::frame::BYTES_PER_PIXEL;
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(SinkError::LengthMismatch {
            expected,
            actual: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transient_errors() {
        assert!(SinkError::from(io::Error::from(io::ErrorKind::Interrupted)).is_transient());
        assert!(SinkError::bus("contention").is_transient());
        assert!(!SinkError::from(io::Error::from(io::ErrorKind::NotFound)).is_transient());
        assert!(!SinkError::Closed.is_transient());
    }

    #[test]
    fn frame_length_must_match() {
        assert!(expect_frame_len(&[0; 6], 2).is_ok());
        assert!(matches!(
            expect_frame_len(&[0; 5], 2),
            Err(SinkError::LengthMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }
}
