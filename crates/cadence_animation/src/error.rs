//! Animation error types

use thiserror::Error;

/// Errors building an easing curve
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EasingError {
    /// Control point x-coordinates must lie in `[0, 1]`
    #[error("Control point x out of range [0, 1]: x1={x1}, x2={x2}")]
    ControlPointOutOfRange { x1: f64, x2: f64 },

    /// A curve needs exactly four control scalars
    #[error("Expected 4 control points, got {0}")]
    WrongArity(usize),

    /// No preset registered under this name
    #[error("Unknown easing preset: {0}")]
    UnknownPreset(String),
}

/// Animation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The animation was reset or dropped before it completed
    #[error("Animation cancelled before completion")]
    Cancelled,

    #[error(transparent)]
    Easing(#[from] EasingError),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
