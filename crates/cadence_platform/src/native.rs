//! Native frame clock adapter
//!
//! Mobile hosts expose a compositor frame callback (Choreographer on Android,
//! CADisplayLink on iOS). Host glue implements [`NativeFrameClock`] to post and
//! remove that callback, and forwards each native frame to
//! [`NativeFrameScheduler::do_frame`].
//!
//! The native callback is posted at most once at a time, however many
//! requests are pending.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::scheduler::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler};

/// Host-provided frame clock
pub trait NativeFrameClock {
    /// Ask the OS for a callback on the next frame
    fn post_frame_callback(&self);

    /// Withdraw a posted frame callback
    fn remove_frame_callback(&self);
}

/// Frame scheduler driven by a native OS frame clock
pub struct NativeFrameScheduler<C: NativeFrameClock> {
    clock: C,
    queue: RefCell<FrameQueue>,
    posted: Cell<bool>,
}

impl<C: NativeFrameClock> NativeFrameScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            queue: RefCell::new(FrameQueue::default()),
            posted: Cell::new(false),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether a native frame callback is currently posted
    pub fn is_posted(&self) -> bool {
        self.posted.get()
    }

    /// Entry point for the native frame callback
    ///
    /// `frame_time_nanos` is the OS frame timestamp; negative values are
    /// treated as zero. Returns the number of callbacks invoked.
    pub fn do_frame(&self, frame_time_nanos: i64) -> usize {
        // The posted callback has been consumed by the OS
        self.posted.set(false);

        let frame_time = Duration::from_nanos(frame_time_nanos.max(0) as u64);
        let order = self.queue.borrow_mut().take_order();
        let mut invoked = 0;

        for handle in order {
            let callback = self.queue.borrow_mut().take_callback(handle);
            if let Some(callback) = callback {
                callback(frame_time);
                invoked += 1;
            }
        }

        tracing::trace!(
            "NativeFrameScheduler: frame at {:?} ran {} callbacks",
            frame_time,
            invoked
        );
        invoked
    }

    fn ensure_posted(&self) {
        if !self.posted.get() {
            self.clock.post_frame_callback();
            self.posted.set(true);
        }
    }
}

impl<C: NativeFrameClock> FrameScheduler for NativeFrameScheduler<C> {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = self.queue.borrow_mut().push(callback);
        self.ensure_posted();
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let (cancelled, empty) = {
            let mut queue = self.queue.borrow_mut();
            (queue.cancel(handle), queue.is_empty())
        };
        if cancelled && empty && self.posted.get() {
            tracing::trace!("NativeFrameScheduler: nothing pending, removing frame callback");
            self.clock.remove_frame_callback();
            self.posted.set(false);
        }
    }

    fn name(&self) -> &'static str {
        "native"
    }

    fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }
}
