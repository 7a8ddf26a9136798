//! Tween error types

use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while building a timeline
///
/// Playback (`update`, `seek_to`, scheduler ticks) never fails; every
/// variant here is a caller mistake caught at construction time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// Tween duration was zero, negative, or not finite
    #[error("tween duration must be positive and finite, got {0}")]
    InvalidDuration(f32),

    /// Wait offset was negative or not finite
    #[error("wait time must be non-negative and finite, got {0}")]
    InvalidWait(f32),

    /// Tween endpoints have different value kinds
    #[error("cannot tween from a {from} value to a {to} value")]
    KindMismatch { from: ValueKind, to: ValueKind },

    /// Timeline description could not be parsed or resolved
    #[error("timeline config error: {0}")]
    Config(String),
}

/// Result type for timeline construction
pub type Result<T> = std::result::Result<T, TweenError>;
