//! Host capabilities and back end selection
//!
//! Selection happens once, in the environment layer, before any animation is
//! played. The animation engine only ever sees the chosen scheduler.

use std::fmt;
use std::str::FromStr;

use crate::error::{PlatformError, Result};

/// What frame timing primitives the host offers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// An OS compositor frame clock is reachable (Choreographer, CADisplayLink)
    pub native_frame_clock: bool,
    /// The host render loop can pump a display-synced dispatch each vsync
    pub display_sync: bool,
}

impl HostCapabilities {
    /// A host with no frame hooks at all; only the timer fallback works
    pub const fn headless() -> Self {
        Self {
            native_frame_clock: false,
            display_sync: false,
        }
    }

    pub fn with_native_frame_clock(mut self, available: bool) -> Self {
        self.native_frame_clock = available;
        self
    }

    pub fn with_display_sync(mut self, available: bool) -> Self {
        self.display_sync = available;
        self
    }

    /// Whether a back end can run on this host
    pub fn supports(&self, backend: Backend) -> bool {
        match backend {
            Backend::NativeClock => self.native_frame_clock,
            Backend::DisplaySync => self.display_sync,
            Backend::Timer => true,
        }
    }
}

/// Frame scheduling back end
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    NativeClock,
    DisplaySync,
    Timer,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::NativeClock, Backend::DisplaySync, Backend::Timer];

    /// Pick the best back end for a host
    ///
    /// Native clock first, then display sync, then the timer, which is
    /// always available.
    pub fn select(caps: HostCapabilities) -> Backend {
        let backend = Self::ALL
            .into_iter()
            .find(|backend| caps.supports(*backend))
            .unwrap_or(Backend::Timer);
        tracing::debug!("Backend: selected {} for {:?}", backend, caps);
        backend
    }

    /// Check that an explicitly requested back end is usable on this host
    pub fn require(self, caps: HostCapabilities) -> Result<Backend> {
        if caps.supports(self) {
            Ok(self)
        } else {
            Err(PlatformError::Unavailable(self.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::NativeClock => "native",
            Backend::DisplaySync => "vsync",
            Backend::Timer => "timer",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "native-clock" => Ok(Backend::NativeClock),
            "vsync" | "display-sync" => Ok(Backend::DisplaySync),
            "timer" => Ok(Backend::Timer),
            other => Err(PlatformError::UnknownBackend(other.to_string())),
        }
    }
}
