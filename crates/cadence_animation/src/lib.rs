//! Cadence Animation Engine
//!
//! Timed property animations driven by a pluggable frame scheduler.
//!
//! # Features
//!
//! - **Cubic Bezier Easing**: sampled Newton-Raphson/bisection solver with exact endpoints
//! - **Preset Registry**: 26 built-in curves per engine, extensible at runtime
//! - **Typed Attributes**: numeric channels with units, RGBA color channels, composed transforms
//! - **Playback State Machine**: loop, alternate, reverse and sequential policies with
//!   pause/resume
//! - **Effect Presets**: fades, slides, zooms, flips and friends built on the public API
//! - **Sequences**: phases chained one after another
//! - **Async Completion**: `play_async()` future for awaiting the end of an animation
//!
//! # Example
//!
//! ```rust
//! use cadence_animation::{Animation, AnimationOptions};
//! use cadence_core::{RecordingSurface, SurfaceHandle};
//! use cadence_platform::VsyncScheduler;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! let scheduler = Rc::new(VsyncScheduler::new());
//! let surface = RecordingSurface::shared();
//!
//! let anim = Animation::new(
//!     Some(surface.clone() as SurfaceHandle),
//!     scheduler.clone(),
//!     AnimationOptions::new().duration_ms(1000).easing("ease-out"),
//! )
//! .translate_x("0px", "100px")
//! .opacity("0", "1");
//! anim.play();
//!
//! // Host render loop, one dispatch per display refresh
//! let mut now = 0.0;
//! while scheduler.has_pending() {
//!     scheduler.dispatch_frame(Duration::from_secs_f64(now / 1000.0));
//!     now += 1000.0 / 60.0;
//! }
//!
//! assert_eq!(surface.get("opacity").as_deref(), Some("1.00"));
//! assert_eq!(surface.get("transform").as_deref(), Some("translateX(100.00px)"));
//! ```

pub mod attribute;
pub mod completion;
pub mod easing;
pub mod engine;
pub mod error;
pub mod options;
pub mod presets;
pub mod registry;
pub mod sequence;

pub use attribute::{
    extract_unit, is_color_property, is_transform_property, Attribute, AttributeValue,
    RenderedValue, TRANSFORM_PROPERTY,
};
pub use completion::PlayAsync;
pub use easing::{CubicBezier, SPLINE_TABLE_SIZE};
pub use engine::{
    Animation, CompleteCallback, EngineState, FrameProgressCallback, PlaybackState,
    StartCallback,
};
pub use error::{AnimationError, EasingError, Result};
pub use options::{AnimationOptions, DEFAULT_DURATION_MS, INFINITE_LOOP};
pub use presets::{Effect, UnknownEffect};
pub use registry::{PresetRegistry, BUILTIN_PRESETS};
pub use sequence::{PhaseFn, Sequence};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::{Animation, PlaybackState};
    pub use crate::error::{AnimationError, Result};
    pub use crate::options::AnimationOptions;
    pub use crate::presets::Effect;
    pub use crate::sequence::Sequence;
}
