//! Per-curve build state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one curve build: `Pending → InProgress → Built | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveState {
    /// Not started.
    #[default]
    Pending,
    /// Solving pillars.
    InProgress,
    /// Every pillar solved.
    Built,
    /// Gave up; the error is reported with the curve.
    Failed,
}

impl CurveState {
    /// True for `Built` and `Failed`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Built | Self::Failed)
    }

    /// Whether `self → next` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, next: CurveState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Failed)
                | (Self::InProgress, Self::Built)
                | (Self::InProgress, Self::Failed)
        )
    }
}

impl fmt::Display for CurveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Built => "Built",
            Self::Failed => "Failed",
        };
        write!(f, "{name}")
    }
}

/// Moves `state` to `next`, logging the transition under `curve`.
pub(crate) fn transition(curve: &str, state: &mut CurveState, next: CurveState) {
    debug_assert!(state.can_transition_to(next), "{state} -> {next}");
    tracing::debug!(curve, from = %state, to = %next, "curve state");
    *state = next;
}
