//! Error types for market conventions.
//!
//! Every fallible date, period, calendar and schedule operation in this crate
//! reports a [`CoreError`].

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by date arithmetic and market conventions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or out-of-range date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string or period could not be interpreted.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },

    /// Schedule generation failed.
    #[error("Schedule error: {reason}")]
    ScheduleError {
        /// Description of the error.
        reason: String,
    },

    /// Day count calculation error.
    #[error("Day count error: {reason}")]
    DayCountError {
        /// Description of the error.
        reason: String,
    },

    /// A rate conversion has no meaningful result.
    #[error("Invalid rate conversion: {reason}")]
    InvalidRate {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar_error(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates a schedule error.
    #[must_use]
    pub fn schedule_error(reason: impl Into<String>) -> Self {
        Self::ScheduleError {
            reason: reason.into(),
        }
    }

    /// Creates a day count error.
    #[must_use]
    pub fn day_count_error(reason: impl Into<String>) -> Self {
        Self::DayCountError {
            reason: reason.into(),
        }
    }

    /// Creates an invalid rate error.
    #[must_use]
    pub fn invalid_rate(reason: impl Into<String>) -> Self {
        Self::InvalidRate {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30");
        assert_eq!(err.to_string(), "Invalid date: 2024-02-30");

        let err = CoreError::invalid_period("3X", "unknown unit 'X'");
        assert!(err.to_string().contains("3X"));
        assert!(err.to_string().contains("unknown unit"));
    }
}
