//! Display-synced frame scheduler
//!
//! The host render loop owns the display refresh and calls
//! [`VsyncScheduler::dispatch_frame`] once per vsync. This is also the
//! deterministic back end used by headless tests: frame times are whatever
//! the caller passes in.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::scheduler::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler};

/// Frame scheduler pumped by the host's rendering loop
#[derive(Default)]
pub struct VsyncScheduler {
    queue: RefCell<FrameQueue>,
    frames_dispatched: Cell<u64>,
}

impl VsyncScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback requested before this call
    ///
    /// Returns the number of callbacks invoked. Callbacks may request or cancel
    /// frames; new requests wait for the next dispatch.
    pub fn dispatch_frame(&self, frame_time: Duration) -> usize {
        let order = self.queue.borrow_mut().take_order();
        let mut invoked = 0;

        for handle in order {
            // Borrow released before the callback runs so it can reschedule
            let callback = self.queue.borrow_mut().take_callback(handle);
            if let Some(callback) = callback {
                callback(frame_time);
                invoked += 1;
            }
        }

        self.frames_dispatched.set(self.frames_dispatched.get() + 1);
        tracing::trace!(
            "VsyncScheduler: frame at {:?} ran {} callbacks",
            frame_time,
            invoked
        );
        invoked
    }

    /// Whether any callback is waiting for the next vsync
    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }

    /// Total number of frames dispatched so far
    pub fn frames_dispatched(&self) -> u64 {
        self.frames_dispatched.get()
    }
}

impl FrameScheduler for VsyncScheduler {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.queue.borrow_mut().push(callback);
        tracing::trace!("VsyncScheduler: requested frame {:?}", handle);
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if self.queue.borrow_mut().cancel(handle) {
            tracing::trace!("VsyncScheduler: cancelled frame {:?}", handle);
        }
    }

    fn name(&self) -> &'static str {
        "vsync"
    }

    fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}
