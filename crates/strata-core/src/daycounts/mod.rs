//! Day count conventions.
//!
//! A day count turns a pair of dates into a year fraction. Curve times,
//! accrual fractions and rate conversions all go through one of these.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360, money markets and overnight indices
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`ActActIsda`]: Actual/Actual ISDA, splits the period by calendar year
//! - [`ActActIcma`]: Actual/Actual ICMA (bond basis), uses a coupon reference period
//! - [`Thirty360Us`]: 30/360 US bond basis
//! - [`Thirty360European`]: 30E/360 Eurobond basis
//!
//! # Usage
//!
//! ```rust
//! use strata_core::daycounts::DayCountConvention;
//! use strata_core::types::Date;
//!
//! let start = Date::from_ymd(2008, 9, 18).unwrap();
//! let end = Date::from_ymd(2008, 12, 18).unwrap();
//! let yf = DayCountConvention::Act360.year_fraction(start, end);
//! assert!((yf - 91.0 / 360.0).abs() < 1e-15);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::{ActActIcma, ActActIsda};
pub use thirty360::{Thirty360European, Thirty360Us};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Date;

/// A day count convention.
pub trait DayCount: Send + Sync {
    /// Market name of the convention (e.g. "ACT/360").
    fn name(&self) -> &'static str;

    /// Number of days between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction between two dates. Negative when `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Year fraction with an explicit coupon reference period.
    ///
    /// Only period-based conventions (ACT/ACT ICMA) use the reference dates;
    /// every other convention ignores them.
    fn year_fraction_with_reference(
        &self,
        start: Date,
        end: Date,
        _ref_start: Date,
        _ref_end: Date,
    ) -> f64 {
        self.year_fraction(start, end)
    }
}

/// Runtime selector over the supported conventions.
///
/// This is the form that appears in requests; it dispatches to the zero-sized
/// implementations above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360.
    Act360,
    /// Actual/365 Fixed.
    #[default]
    Act365Fixed,
    /// Actual/Actual ISDA.
    ActActIsda,
    /// Actual/Actual ICMA (bond basis).
    #[serde(alias = "ActActBond", alias = "ActActIsma")]
    ActActIcma,
    /// 30/360 US bond basis.
    Thirty360Us,
    /// 30E/360.
    Thirty360European,
}

static ACT_360: Act360 = Act360;
static ACT_365_FIXED: Act365Fixed = Act365Fixed;
static ACT_ACT_ISDA: ActActIsda = ActActIsda;
static ACT_ACT_ICMA: ActActIcma = ActActIcma;
static THIRTY_360_US: Thirty360Us = Thirty360Us;
static THIRTY_360_E: Thirty360European = Thirty360European;

impl DayCountConvention {
    /// The implementation behind this convention.
    #[must_use]
    pub fn day_count(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Act360 => &ACT_360,
            DayCountConvention::Act365Fixed => &ACT_365_FIXED,
            DayCountConvention::ActActIsda => &ACT_ACT_ISDA,
            DayCountConvention::ActActIcma => &ACT_ACT_ICMA,
            DayCountConvention::Thirty360Us => &THIRTY_360_US,
            DayCountConvention::Thirty360European => &THIRTY_360_E,
        }
    }

    /// Year fraction between two dates.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count().year_fraction(start, end)
    }

    /// Year fraction with a coupon reference period.
    #[must_use]
    pub fn year_fraction_with_reference(
        &self,
        start: Date,
        end: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> f64 {
        self.day_count()
            .year_fraction_with_reference(start, end, ref_start, ref_end)
    }

    /// Market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.day_count().name()
    }

    /// All supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::Thirty360Us,
            DayCountConvention::Thirty360European,
        ]
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_matches_implementations() {
        let start = Date::from_ymd(2024, 1, 15).unwrap();
        let end = Date::from_ymd(2024, 7, 15).unwrap();

        assert_relative_eq!(
            DayCountConvention::Act360.year_fraction(start, end),
            182.0 / 360.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            DayCountConvention::Act365Fixed.year_fraction(start, end),
            182.0 / 365.0,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            DayCountConvention::Thirty360Us.year_fraction(start, end),
            0.5,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_every_convention_is_antisymmetric() {
        let a = Date::from_ymd(2007, 5, 15).unwrap();
        let b = Date::from_ymd(2017, 5, 15).unwrap();
        for convention in DayCountConvention::all() {
            let forward = convention.year_fraction(a, b);
            let backward = convention.year_fraction(b, a);
            assert_relative_eq!(forward, -backward, epsilon = 1e-12);
            assert_eq!(convention.year_fraction(a, a), 0.0);
        }
    }

    #[test]
    fn test_serde_aliases() {
        let dc: DayCountConvention = serde_json::from_str("\"ActActBond\"").unwrap();
        assert_eq!(dc, DayCountConvention::ActActIcma);
        let dc: DayCountConvention = serde_json::from_str("\"ActActIsda\"").unwrap();
        assert_eq!(dc, DayCountConvention::ActActIsda);
    }
}
