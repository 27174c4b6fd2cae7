//! Clock and frame-request seams
//!
//! The scheduler never talks to a display directly. The platform hands it a
//! [`Clock`] and a [`FrameRequester`] and calls [`Scheduler::tick`] with the
//! fired [`FrameHandle`] from its frame callback. [`ManualFrames`] and [`ManualClock`] drive the same loop
//! headlessly, for tests and offline simulation.

use crate::scheduler::{Scheduler, TickReport};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;

/// Opaque id of a requested frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Something that can call the scheduler back on the next display refresh
pub trait FrameRequester {
    fn request_frame(&mut self) -> FrameHandle;

    /// The callback for `handle` must not fire after this returns
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Milliseconds since the clock was created
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, time_ms: f64) {
        self.now.set(time_ms);
    }

    pub fn advance(&self, delta_ms: f64) -> f64 {
        let now = self.now.get() + delta_ms;
        self.now.set(now);
        now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
struct FrameQueue {
    next_handle: u64,
    queued: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
    fired: u64,
}

/// Headless frame source. Clones share one queue, so the scheduler can own
/// one clone while the driver fires frames through another.
#[derive(Clone, Debug, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the oldest outstanding frame, if any, by ticking `scheduler`
    pub fn fire(&self, scheduler: &mut Scheduler, time: f64) -> Option<TickReport> {
        let handle = self.queue.borrow_mut().queued.pop_front()?;
        self.queue.borrow_mut().fired += 1;
        tracing::trace!(handle = handle.0, time, "firing frame");
        scheduler.tick(handle, time)
    }

    /// Outstanding frame requests
    pub fn pending(&self) -> usize {
        self.queue.borrow().queued.len()
    }

    pub fn requested(&self) -> u64 {
        self.queue.borrow().requested
    }

    pub fn cancelled(&self) -> u64 {
        self.queue.borrow().cancelled
    }

    pub fn fired(&self) -> u64 {
        self.queue.borrow().fired
    }
}

impl FrameRequester for ManualFrames {
    fn request_frame(&mut self) -> FrameHandle {
        let mut queue = self.queue.borrow_mut();
        queue.next_handle += 1;
        queue.requested += 1;
        let handle = FrameHandle(queue.next_handle);
        queue.queued.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut queue = self.queue.borrow_mut();
        let before = queue.queued.len();
        queue.queued.retain(|&queued| queued != handle);
        if queue.queued.len() != before {
            queue.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(5.0);
        let other = clock.clone();
        clock.advance(10.0);
        assert_eq!(other.now(), 15.0);
        other.set(100.0);
        assert_eq!(clock.now(), 100.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(a >= 0.0);
    }

    #[test]
    fn test_manual_frames_request_and_cancel() {
        let frames = ManualFrames::new();
        let mut requester = frames.clone();

        let first = requester.request_frame();
        let second = requester.request_frame();
        assert_ne!(first, second);
        assert_eq!(frames.pending(), 2);

        requester.cancel_frame(first);
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.cancelled(), 1);

        // Unknown handles are ignored
        requester.cancel_frame(first);
        assert_eq!(frames.cancelled(), 1);
        assert_eq!(frames.requested(), 2);
    }
}
