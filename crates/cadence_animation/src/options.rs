//! Animation configuration
//!
//! Options cover everything about an animation except its attributes and
//! callbacks. They deserialize from any serde format with every field
//! optional:
//!
//! ```toml
//! duration_ms = 1000
//! loop = -1
//! alternate = true
//! easing = "ease-in-out"
//! ```

use serde::{Deserialize, Serialize};

use crate::easing::CubicBezier;
use crate::error::Result;
use crate::registry::PresetRegistry;

/// Default animation duration in milliseconds
pub const DEFAULT_DURATION_MS: u32 = 500;

/// Loop count meaning "repeat until stopped"
pub const INFINITE_LOOP: i32 = -1;

/// Playback configuration for an animation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationOptions {
    /// Duration of one cycle in milliseconds
    pub duration_ms: u32,
    /// Number of cycles (-1 = infinite)
    #[serde(rename = "loop")]
    pub loop_count: i32,
    /// Reverse direction on every other cycle
    pub alternate: bool,
    /// Animate attributes one after another instead of together
    pub sequential: bool,
    /// Play from `to` back to `from`
    pub reverse: bool,
    /// Name of an easing preset
    pub easing: Option<String>,
    /// Custom `[x1, y1, x2, y2]` curve, overrides `easing`
    pub bezier: Option<Vec<f64>>,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            loop_count: 1,
            alternate: false,
            sequential: false,
            reverse: false,
            easing: None,
            bezier: None,
        }
    }
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn loop_count(mut self, count: i32) -> Self {
        self.loop_count = count;
        self
    }

    pub fn alternate(mut self, alternate: bool) -> Self {
        self.alternate = alternate;
        self
    }

    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn easing(mut self, name: impl Into<String>) -> Self {
        self.easing = Some(name.into());
        self
    }

    pub fn bezier(mut self, points: impl Into<Vec<f64>>) -> Self {
        self.bezier = Some(points.into());
        self
    }

    /// Resolve the configured easing curve
    ///
    /// A `bezier` of exactly four values takes precedence over `easing`; any
    /// other length is ignored. Returns `Ok(None)` when no curve is
    /// configured.
    pub fn resolve_easing(&self, registry: &PresetRegistry) -> Result<Option<CubicBezier>> {
        if let Some(points) = self.bezier.as_deref().filter(|points| points.len() == 4) {
            return Ok(Some(CubicBezier::from_slice(points)?));
        }
        match &self.easing {
            Some(name) => Ok(Some(registry.resolve(name)?)),
            None => Ok(None),
        }
    }
}
