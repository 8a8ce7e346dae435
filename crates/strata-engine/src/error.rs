//! Engine error types.
//!
//! Every failure the engine reports carries a stable [`ErrorKind`] and a
//! human-readable message. Only [`ErrorKind::InvalidRequest`] and
//! [`ErrorKind::Config`] abort a batch; everything else is attached to the
//! curve (or grid point) it came from.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::CoreError;
use strata_curves::CurveError;
use thiserror::Error;

/// A specialized Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Machine-checkable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A helper names an index that is not defined in the batch.
    MissingIndexReference,
    /// A curve references a curve id that is not in the batch.
    MissingDependency,
    /// The curve sits on a dependency cycle.
    CyclicDependency,
    /// A curve this one depends on failed.
    DependencyFailed,
    /// Helper and curve settings that cannot be combined.
    UnsupportedHelperCombination,
    /// Two helpers share a pillar date. Recovered by dropping the later
    /// one; never attached to a result.
    DuplicatePillarDate,
    /// The root solver gave up on a pillar.
    NonConvergence,
    /// A query date before the reference date or past the last pillar.
    QueryOutOfRange,
    /// A helper names a quote id that is not in the batch.
    InvalidQuoteReference,
    /// The batch deadline passed before the curve was scheduled.
    Cancelled,
    /// Malformed dates, tenors or conventions.
    InvalidInput,
    /// The batch as a whole is unusable.
    InvalidRequest,
    /// Engine configuration could not be loaded or is invalid.
    Config,
}

impl ErrorKind {
    /// The snake-case code used on the wire.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingIndexReference => "missing_index_reference",
            Self::MissingDependency => "missing_dependency",
            Self::CyclicDependency => "cyclic_dependency",
            Self::DependencyFailed => "dependency_failed",
            Self::UnsupportedHelperCombination => "unsupported_helper_combination",
            Self::DuplicatePillarDate => "duplicate_pillar_date",
            Self::NonConvergence => "non_convergence",
            Self::QueryOutOfRange => "query_out_of_range",
            Self::InvalidQuoteReference => "invalid_quote_reference",
            Self::Cancelled => "cancelled",
            Self::InvalidInput => "invalid_input",
            Self::InvalidRequest => "invalid_request",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Structured error as it appears in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Failure category.
    pub kind: ErrorKind,
    /// Description for humans.
    pub message: String,
}

/// Engine error type.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Unknown index id.
    #[error("Unknown index id '{index}'")]
    MissingIndexReference {
        /// The id that did not resolve.
        index: String,
    },

    /// Unknown curve id.
    #[error("Curve '{curve}' references unknown curve '{missing}'")]
    MissingDependency {
        /// The referencing curve.
        curve: String,
        /// The id that did not resolve.
        missing: String,
    },

    /// Dependency cycle.
    #[error("Curve '{curve}' is on a dependency cycle: {}", cycle.join(" -> "))]
    CyclicDependency {
        /// The failing curve.
        curve: String,
        /// Members of the cycle, in request order.
        cycle: Vec<String>,
    },

    /// A dependency failed.
    #[error("Curve '{curve}' depends on failed curve '{root_cause}'")]
    DependencyFailed {
        /// The failing curve.
        curve: String,
        /// The curve whose failure caused this one.
        root_cause: String,
    },

    /// Helper or curve settings that cannot be combined.
    #[error("Unsupported helper combination: {reason}")]
    UnsupportedHelperCombination {
        /// What was combined.
        reason: String,
    },

    /// Bootstrap non-convergence.
    #[error("Bootstrap did not converge: {reason}")]
    NonConvergence {
        /// Solver diagnostics.
        reason: String,
    },

    /// Query outside the curve's domain.
    #[error("Query out of range: {reason}")]
    QueryOutOfRange {
        /// The offending date or time.
        reason: String,
    },

    /// Unknown quote id.
    #[error("Unknown quote id '{quote_id}'")]
    InvalidQuoteReference {
        /// The id that did not resolve.
        quote_id: String,
    },

    /// Not scheduled before the deadline.
    #[error("Curve '{curve}' cancelled: batch deadline passed")]
    Cancelled {
        /// The cancelled curve.
        curve: String,
    },

    /// Malformed input.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },

    /// Batch-fatal request problem.
    #[error("Invalid request: {reason}")]
    InvalidRequest {
        /// What was wrong.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// What was wrong.
        reason: String,
    },
}

impl EngineError {
    /// Creates a missing index error.
    #[must_use]
    pub fn missing_index(index: impl Into<String>) -> Self {
        Self::MissingIndexReference {
            index: index.into(),
        }
    }

    /// Creates an unsupported combination error.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedHelperCombination {
            reason: reason.into(),
        }
    }

    /// Creates an invalid quote reference error.
    #[must_use]
    pub fn invalid_quote(quote_id: impl Into<String>) -> Self {
        Self::InvalidQuoteReference {
            quote_id: quote_id.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(curve: impl Into<String>) -> Self {
        Self::Cancelled {
            curve: curve.into(),
        }
    }

    /// Failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingIndexReference { .. } => ErrorKind::MissingIndexReference,
            Self::MissingDependency { .. } => ErrorKind::MissingDependency,
            Self::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            Self::DependencyFailed { .. } => ErrorKind::DependencyFailed,
            Self::UnsupportedHelperCombination { .. } => ErrorKind::UnsupportedHelperCombination,
            Self::NonConvergence { .. } => ErrorKind::NonConvergence,
            Self::QueryOutOfRange { .. } => ErrorKind::QueryOutOfRange,
            Self::InvalidQuoteReference { .. } => ErrorKind::InvalidQuoteReference,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// The response form of this error.
    #[must_use]
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<CurveError> for EngineError {
    fn from(e: CurveError) -> Self {
        let reason = e.to_string();
        match e {
            CurveError::NonConvergence { .. } | CurveError::PassesExhausted { .. } => {
                Self::NonConvergence { reason }
            }
            CurveError::BeforeReference { .. } | CurveError::BeyondLastPillar { .. } => {
                Self::QueryOutOfRange { reason }
            }
            CurveError::UnsupportedCombination { .. } => {
                Self::UnsupportedHelperCombination { reason }
            }
            CurveError::InvalidInstrument { .. }
            | CurveError::InsufficientPillars { .. }
            | CurveError::InvalidValue { .. }
            | CurveError::Core(_)
            | CurveError::Math(_) => Self::InvalidInput { reason },
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(e: CoreError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::types::Date;

    #[test]
    fn test_kind_codes_match_serde() {
        for kind in [
            ErrorKind::MissingIndexReference,
            ErrorKind::DependencyFailed,
            ErrorKind::UnsupportedHelperCombination,
            ErrorKind::QueryOutOfRange,
            ErrorKind::Cancelled,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_curve_error_mapping() {
        let pillar = Date::from_ymd(2025, 1, 2).unwrap();
        let e: EngineError = CurveError::non_convergence(pillar, "Swap 5Y", "bracket").into();
        assert_eq!(e.kind(), ErrorKind::NonConvergence);

        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let e: EngineError = CurveError::before_reference(pillar, reference).into();
        assert_eq!(e.kind(), ErrorKind::QueryOutOfRange);

        let e: EngineError = CurveError::invalid_instrument("bad").into();
        assert_eq!(e.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_cycle_message() {
        let e = EngineError::CyclicDependency {
            curve: "A".into(),
            cycle: vec!["A".into(), "B".into()],
        };
        assert!(e.to_string().contains("A -> B"));
        assert_eq!(e.info().kind, ErrorKind::CyclicDependency);
    }
}
