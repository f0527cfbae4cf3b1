use core::time::Duration;

use log::warn;

use super::{Sink, SinkError};

/// How often and how patiently [`Retrying`] repeats a failed write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per frame, including the first one
    pub attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const NONE: Self = Self {
        attempts: 1,
        backoff: Duration::ZERO,
    };

    pub const fn new(attempts: u32, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(2))
    }
}

/// Sink wrapper that retries transient write errors
///
/// Fatal errors, and the last transient error once attempts run out, are
/// returned unchanged. `close` is never retried.
pub struct Retrying<S: Sink> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: Sink> Retrying<S> {
    pub const fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Sink> Sink for Retrying<S> {
    fn pixel_count(&self) -> usize {
        self.inner.pixel_count()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut attempt = 1;
        loop {
            match self.inner.write(bytes) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_transient() && attempt < self.policy.attempts => {
                    warn!(
                        "write attempt {attempt}/{} failed: {err}",
                        self.policy.attempts
                    );
                    attempt += 1;
                    if !self.policy.backoff.is_zero() {
                        std::thread::sleep(self.policy.backoff);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.inner.close()
    }
}
