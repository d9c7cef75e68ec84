//! Frame scheduler interface
//!
//! A frame scheduler invokes a one-shot callback on the next display frame.
//! Each request yields a [`FrameHandle`] that can cancel it before it fires.
//! All back ends share the same contract:
//!
//! - a callback runs at most once per request
//! - a cancelled callback never runs
//! - a callback requested while frames are being dispatched runs on the
//!   following frame, never the current one

use slotmap::{new_key_type, SlotMap};
use std::rc::Rc;
use std::time::Duration;

new_key_type! {
    /// Handle to a pending frame request
    pub struct FrameHandle;
}

impl FrameHandle {
    /// Convert to a raw u64 for passing across an FFI boundary
    pub fn to_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Reconstruct from a raw u64 produced by [`FrameHandle::to_raw`]
    pub fn from_raw(raw: u64) -> Self {
        slotmap::KeyData::from_ffi(raw).into()
    }
}

/// Callback invoked with the frame timestamp
///
/// The timestamp is measured from the back end's own epoch; only differences
/// between timestamps are meaningful.
pub type FrameCallback = Box<dyn FnOnce(Duration)>;

/// Interface over "call me back once per display refresh"
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending request
    ///
    /// Cancelling a handle that already fired or was already cancelled is a no-op.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Short back end name for diagnostics
    fn name(&self) -> &'static str;

    /// Number of requests waiting for a frame
    fn pending_count(&self) -> usize;
}

/// Shared handle to the active frame scheduler
pub type SchedulerRef = Rc<dyn FrameScheduler>;

/// Pending callbacks in request order
///
/// Shared bookkeeping for the back ends. Dispatch removes each callback right
/// before running it, so a cancel issued by an earlier callback in the same
/// frame is still honored.
#[derive(Default)]
pub(crate) struct FrameQueue {
    callbacks: SlotMap<FrameHandle, FrameCallback>,
    order: Vec<FrameHandle>,
}

impl FrameQueue {
    pub(crate) fn push(&mut self, callback: FrameCallback) -> FrameHandle {
        let handle = self.callbacks.insert(callback);
        self.order.push(handle);
        handle
    }

    /// Remove a request, returning whether it was still pending
    pub(crate) fn cancel(&mut self, handle: FrameHandle) -> bool {
        if self.callbacks.remove(handle).is_some() {
            self.order.retain(|h| *h != handle);
            true
        } else {
            false
        }
    }

    /// Detach the current frame's requests
    ///
    /// Requests pushed after this call belong to the next frame.
    pub(crate) fn take_order(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.order)
    }

    pub(crate) fn take_callback(&mut self, handle: FrameHandle) -> Option<FrameCallback> {
        self.callbacks.remove(handle)
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}
