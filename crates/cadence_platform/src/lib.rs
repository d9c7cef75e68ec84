//! Cadence Platform Abstraction Layer
//!
//! This crate hides "call me back once per display frame" behind one trait so
//! the animation engine never needs to know which host it runs on.
//!
//! # Architecture
//!
//! - [`FrameScheduler`] - request and cancel one-shot frame callbacks
//! - [`VsyncScheduler`] - display-synced back end, pumped by the host render loop
//! - [`TimerScheduler`] - fixed-rate (~60 Hz) timer fallback
//! - [`NativeFrameScheduler`] - adapter over an OS frame clock such as Android's
//!   Choreographer or iOS's CADisplayLink, via [`NativeFrameClock`]
//!
//! Back end selection happens once, outside the engine, from
//! [`HostCapabilities`] through [`Backend::select`].
//!
//! # Example
//!
//! ```rust
//! use cadence_platform::{FrameScheduler, VsyncScheduler};
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = VsyncScheduler::new();
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! scheduler.request_frame(Box::new(move |_frame_time| flag.set(true)));
//!
//! // The host calls this once per display refresh
//! scheduler.dispatch_frame(Duration::from_millis(16));
//! assert!(fired.get());
//! ```

mod capabilities;
mod error;
mod native;
mod scheduler;
mod timer;
mod vsync;

pub use capabilities::{Backend, HostCapabilities};
pub use error::{PlatformError, Result};
pub use native::{NativeFrameClock, NativeFrameScheduler};
pub use scheduler::{FrameCallback, FrameHandle, FrameScheduler, SchedulerRef};
pub use timer::{TimerScheduler, DEFAULT_TIMER_INTERVAL};
pub use vsync::VsyncScheduler;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::capabilities::{Backend, HostCapabilities};
    pub use crate::error::{PlatformError, Result};
    pub use crate::native::{NativeFrameClock, NativeFrameScheduler};
    pub use crate::scheduler::{FrameCallback, FrameHandle, FrameScheduler, SchedulerRef};
    pub use crate::timer::TimerScheduler;
    pub use crate::vsync::VsyncScheduler;
}
