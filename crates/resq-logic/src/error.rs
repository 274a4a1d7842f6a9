//! Scenario validation errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a scenario was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum InvalidReason {
    /// The scenario has no steps at all.
    #[error("scenario has no steps")]
    NoSteps,
    /// A step has a zero-second time budget.
    #[error("step {index} has a zero duration")]
    ZeroDuration { index: usize },
    /// Step durations add up to more seconds than the drill clock can count.
    #[error("total duration exceeds {} seconds", u32::MAX)]
    TotalTooLong,
}

/// Errors raised by the drill sequencer.
///
/// `tick`, `pause` and `resume` outside their valid states are not errors;
/// they are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrillError {
    /// `start` was handed a scenario that cannot be run.
    #[error("invalid scenario `{name}`: {reason}")]
    InvalidScenario { name: String, reason: InvalidReason },
}

impl DrillError {
    pub fn reason(&self) -> InvalidReason {
        match self {
            Self::InvalidScenario { reason, .. } => *reason,
        }
    }
}
