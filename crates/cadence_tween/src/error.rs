//! Tween error types

use cadence_core::OwnerKey;
use thiserror::Error;

use crate::scheduler::HandleId;

/// A handle that panicked while being advanced or disposed
#[derive(Debug, Clone, PartialEq)]
pub struct HandleFault {
    pub handle: HandleId,
    pub owner: OwnerKey,
    pub message: String,
}

/// Tween construction and scheduling errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    /// Duration is negative, NaN or infinite
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    /// Repeat interval is not a positive finite number
    #[error("Invalid repeat interval: {0}")]
    InvalidInterval(f64),

    /// Tick delta is negative or NaN
    #[error("Invalid tick delta: {0}")]
    InvalidDelta(f64),

    /// Root node has nothing to run
    #[error("Cannot play an empty tween tree")]
    EmptyRoot,

    /// `tick` was called from a callback fired by `tick`
    #[error("Scheduler is already ticking")]
    ReentrantTick,

    /// The scheduler behind a weak handle no longer exists
    #[error("Scheduler has been dropped")]
    SchedulerDropped,

    /// The thread-local scheduler was used before `global::initialize`
    #[error("Global tween scheduler is not initialized")]
    NotInitialized,

    /// One or more handles panicked during a tick; every other handle was still advanced
    #[error("{} tween handle(s) faulted during tick", .0.len())]
    HandlesFaulted(Vec<HandleFault>),
}

/// Result type for tween operations
pub type Result<T> = std::result::Result<T, TweenError>;

/// Reject durations that cannot be advanced against
pub(crate) fn check_duration(duration: f64) -> Result<f64> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(duration)
    } else {
        Err(TweenError::InvalidDuration(duration))
    }
}
