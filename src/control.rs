//! Control channel for a running render loop.
//!
//! A bounded queue built on `critical-section` and `heapless::Deque`. Senders
//! may live on any thread; the loop drains it once per tick without blocking.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Commands understood by the render loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Finish the current tick, close the sink and return
    Stop,
}

/// Error returned when sending to a full channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub LoopControl);

/// Bounded command queue shared between the loop and its controllers
///
/// `new` is `const`, so the channel can live in a `static` and hand out
/// `'static` senders to other threads.
pub struct ControlChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<LoopControl, SIZE>>>,
}

impl<const SIZE: usize> ControlChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle, any number may coexist
    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { channel: self }
    }

    /// Get the receiving handle for the render loop
    pub const fn receiver(&self) -> ControlReceiver<'_, SIZE> {
        ControlReceiver { channel: self }
    }

    pub fn try_send(&self, command: LoopControl) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Option<LoopControl> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for ControlChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    pub fn try_send(&self, command: LoopControl) -> Result<(), TrySendError> {
        self.channel.try_send(command)
    }

    /// Ask the loop to stop
    ///
    /// A full queue already holds a pending command, so the request is
    /// dropped silently in that case.
    pub fn stop(&self) {
        let _ = self.try_send(LoopControl::Stop);
    }
}

#[derive(Clone, Copy)]
pub struct ControlReceiver<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<LoopControl> {
        self.channel.try_receive()
    }
}
