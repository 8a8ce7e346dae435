//! Actual/360 day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/360: actual days over a 360-day year.
///
/// Money market deposits, FRAs and most overnight indices (SOFR, €STR).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }
}
