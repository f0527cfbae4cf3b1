//! The render loop.
//!
//! One thread runs the cycle read clock, render, pack, write, wait. The loop
//! is a small state machine:
//!
//! ```text
//! Initializing --run--> Running --stop / write error--> Terminated
//! ```
//!
//! The sink is closed exactly once when the loop reaches `Terminated`,
//! whatever the reason.

use embassy_time::Duration;
use log::{debug, info, warn};

use crate::{
    clock::{Clock, Stopwatch},
    control::{ControlReceiver, LoopControl},
    fps::FpsCounter,
    frame::{FrameBuffer, TransmissionBuffer},
    frame_scheduler::{DEFAULT_FPS, FrameScheduler},
    pattern::Pattern,
    sink::{Sink, SinkError},
};

/// Capacity of the control queue a loop accepts by default
pub const DEFAULT_CONTROL_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Target frames per second
    pub fps: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

/// Why a loop stopped without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A [`LoopControl::Stop`] command was received
    Cancelled,
}

/// Summary of a loop that terminated cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    /// Frames delivered to the sink
    pub frames: u64,
    pub reason: ExitReason,
}

/// Drives `pattern` into `sink` at a fixed frame rate
pub struct RenderLoop<'a, P: Pattern, S: Sink, C: Clock, const SIZE: usize> {
    pattern: P,
    sink: S,
    clock: C,
    control: Option<ControlReceiver<'a, SIZE>>,
    config: LoopConfig,
    state: LoopState,
}

impl<P: Pattern, S: Sink, C: Clock> RenderLoop<'static, P, S, C, DEFAULT_CONTROL_SIZE> {
    /// Create a loop without a control channel
    ///
    /// Such a loop only terminates when the sink fails.
    pub fn new(pattern: P, sink: S, clock: C, config: LoopConfig) -> Self {
        Self {
            pattern,
            sink,
            clock,
            control: None,
            config,
            state: LoopState::Initializing,
        }
    }
}

impl<'a, P: Pattern, S: Sink, C: Clock, const SIZE: usize> RenderLoop<'a, P, S, C, SIZE> {
    /// Attach the channel the loop polls for commands once per tick
    pub fn with_control<'b, const N: usize>(
        self,
        control: ControlReceiver<'b, N>,
    ) -> RenderLoop<'b, P, S, C, N> {
        RenderLoop {
            pattern: self.pattern,
            sink: self.sink,
            clock: self.clock,
            control: Some(control),
            config: self.config,
            state: self.state,
        }
    }

    pub const fn state(&self) -> LoopState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pattern(&self) -> &P {
        &self.pattern
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run until cancelled or until the sink fails
    ///
    /// The sink is closed before returning. A write error takes precedence
    /// over a close error that follows it. A loop runs at most once, later
    /// calls return [`SinkError::Closed`].
    pub fn run(&mut self) -> Result<LoopExit, SinkError> {
        if self.state != LoopState::Initializing {
            return Err(SinkError::Closed);
        }

        let outcome = self.drive();
        self.state = LoopState::Terminated;
        let closed = self.sink.close();

        match (outcome, closed) {
            (Ok(exit), Ok(())) => {
                info!("render loop stopped after {} frames", exit.frames);
                Ok(exit)
            }
            (Ok(_), Err(err)) => Err(err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!("closing sink after write failure: {close_err}");
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<LoopExit, SinkError> {
        let pixel_count = self.sink.pixel_count();
        let mut frame = FrameBuffer::new(pixel_count);
        let mut bytes = TransmissionBuffer::for_pixels(pixel_count);

        let start = self.clock.now();
        let stopwatch = Stopwatch::started_at(start);
        let mut scheduler = FrameScheduler::with_fps(self.config.fps);
        scheduler.start(start);
        let mut fps = FpsCounter::new(start);

        info!(
            "render loop started: {} pixels at {} fps ({} ms per frame)",
            pixel_count,
            self.config.fps,
            scheduler.interval().as_millis()
        );
        self.state = LoopState::Running;

        let mut frames: u64 = 0;
        loop {
            if self.stop_requested() {
                return Ok(LoopExit {
                    frames,
                    reason: ExitReason::Cancelled,
                });
            }

            let t_ms = stopwatch.elapsed_millis(self.clock.now());
            self.pattern.render(&mut frame, t_ms);
            frame.write_bytes(&mut bytes);
            self.sink.write(bytes.as_bytes())?;
            frames += 1;

            let done = self.clock.now();
            fps.tick(done);
            let next = scheduler.advance(done);
            if next.missed > 0 {
                warn!(
                    "frame overran by {} intervals, skipping them",
                    next.missed
                );
            }
            if next.sleep_duration > Duration::from_ticks(0) {
                self.clock.sleep_until(next.next_deadline);
            }
        }
    }

    fn stop_requested(&self) -> bool {
        let Some(control) = &self.control else {
            return false;
        };
        match control.try_receive() {
            Some(LoopControl::Stop) => {
                debug!("stop requested");
                true
            }
            None => false,
        }
    }
}
