//! Error types for curve construction and queries.

use strata_core::{CoreError, Date};
use strata_math::MathError;
use thiserror::Error;

use crate::value_type::BootstrapTrait;
use crate::interpolation::InterpolationScheme;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// A date lies before the curve's reference date.
    #[error("Date {date} is before the reference date {reference}")]
    BeforeReference {
        /// The requested date.
        date: Date,
        /// The curve's reference date.
        reference: Date,
    },

    /// A time lies beyond the last pillar and the curve does not extrapolate.
    #[error("Time {t:.6} beyond last pillar {max:.6} with extrapolation disabled")]
    BeyondLastPillar {
        /// Requested time in years.
        t: f64,
        /// Time of the last pillar.
        max: f64,
    },

    /// The bootstrap trait and interpolation scheme cannot be combined.
    #[error("Unsupported combination: {bootstrap_trait} with {scheme} interpolation: {reason}")]
    UnsupportedCombination {
        /// Requested bootstrap trait.
        bootstrap_trait: BootstrapTrait,
        /// Requested interpolation scheme.
        scheme: InterpolationScheme,
        /// Why the pair is rejected.
        reason: String,
    },

    /// The root finder could not reprice an instrument.
    #[error("Bootstrap failed at pillar {pillar} ({instrument}): {reason}")]
    NonConvergence {
        /// Pillar being solved.
        pillar: Date,
        /// Description of the instrument.
        instrument: String,
        /// Failure detail.
        reason: String,
    },

    /// Iterative passes did not settle.
    #[error("Bootstrap did not converge after {passes} passes (max node change {max_change:.2e})")]
    PassesExhausted {
        /// Passes run.
        passes: u32,
        /// Largest node change in the last pass.
        max_change: f64,
    },

    /// Invalid calibration instrument.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of what's wrong with the instrument.
        reason: String,
    },

    /// Not enough pillars to build a curve.
    #[error("Insufficient pillars: need at least {required}, got {got}")]
    InsufficientPillars {
        /// Minimum required pillars.
        required: usize,
        /// Pillars available after filtering.
        got: usize,
    },

    /// Invalid value (NaN, Inf, or domain error).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why value is invalid.
        reason: String,
    },

    /// Date or convention failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical failure.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a before-reference error.
    #[must_use]
    pub fn before_reference(date: Date, reference: Date) -> Self {
        Self::BeforeReference { date, reference }
    }

    /// Creates a beyond-last-pillar error.
    #[must_use]
    pub fn beyond_last_pillar(t: f64, max: f64) -> Self {
        Self::BeyondLastPillar { t, max }
    }

    /// Creates an unsupported combination error.
    #[must_use]
    pub fn unsupported_combination(
        bootstrap_trait: BootstrapTrait,
        scheme: InterpolationScheme,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedCombination {
            bootstrap_trait,
            scheme,
            reason: reason.into(),
        }
    }

    /// Creates a non-convergence error.
    #[must_use]
    pub fn non_convergence(
        pillar: Date,
        instrument: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::NonConvergence {
            pillar,
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// True for errors raised by querying outside the curve's domain.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::BeforeReference { .. } | Self::BeyondLastPillar { .. }
        )
    }

    /// True for solver and pass failures.
    #[must_use]
    pub fn is_non_convergence(&self) -> bool {
        matches!(
            self,
            Self::NonConvergence { .. } | Self::PassesExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::beyond_last_pillar(31.5, 30.0);
        assert!(err.to_string().contains("31.5"));
        assert!(err.is_out_of_range());

        let pillar = Date::from_ymd(2018, 8, 15).unwrap();
        let err = CurveError::non_convergence(pillar, "Bond 4.000% 2018-08-15", "invalid bracket");
        assert!(err.to_string().contains("2018-08-15"));
        assert!(err.is_non_convergence());
    }

    #[test]
    fn test_from_lower_layers() {
        let err: CurveError = MathError::invalid_input("bad").into();
        assert!(matches!(err, CurveError::Math(_)));
        let err: CurveError = CoreError::invalid_date("2024-02-30").into();
        assert_eq!(err.to_string(), "Invalid date: 2024-02-30");
    }
}
