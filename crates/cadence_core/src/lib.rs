//! Cadence Core
//!
//! Shared primitives for the Cadence animation engine:
//!
//! - **Color**: parsing of `#rrggbb` and `rgb()`/`rgba()` strings, interpolation,
//!   and `rgba(r,g,b,a)` serialization
//! - **Numbers**: `parseFloat`-style leading-number parsing and fixed-decimal output
//! - **Target Surface**: the property-setter interface an animation drives, plus a
//!   recording implementation for headless use and tests
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Color, RecordingSurface, TargetSurface};
//!
//! let surface = RecordingSurface::new();
//! let mid = Color::parse("#000000").lerp(&Color::parse("#ffffff"), 0.5);
//! surface.set_property("color", &mid.to_css());
//! assert_eq!(surface.get("color").as_deref(), Some("rgba(128,128,128,1.0)"));
//! ```

pub mod color;
pub mod number;
pub mod surface;

pub use color::{is_color_literal, normalize_color, Color};
pub use number::{format_fixed, parse_leading_f64};
pub use surface::{PropertyWrite, RecordingSurface, SurfaceHandle, TargetSurface};
