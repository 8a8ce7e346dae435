//! Actual/Actual day count conventions.

use super::DayCount;
use crate::types::{is_leap_year, Date};

/// Actual/Actual ISDA.
///
/// The period is split at calendar year boundaries; days falling in a leap
/// year are divided by 366 and the rest by 365. Whole calendar years count
/// exactly one each; a span starting mid-year does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start == end {
            return 0.0;
        }
        if start > end {
            return -self.year_fraction(end, start);
        }

        let y1 = start.year();
        let y2 = end.year();
        let basis = |year: i32| if is_leap_year(year) { 366.0 } else { 365.0 };

        if y1 == y2 {
            return start.days_between(&end) as f64 / basis(y1);
        }

        let (Ok(next_year_start), Ok(last_year_start)) =
            (Date::from_ymd(y1 + 1, 1, 1), Date::from_ymd(y2, 1, 1))
        else {
            return start.days_between(&end) as f64 / 365.0;
        };

        let head = start.days_between(&next_year_start) as f64 / basis(y1);
        let tail = last_year_start.days_between(&end) as f64 / basis(y2);
        head + f64::from(y2 - y1 - 1) + tail
    }
}

/// Actual/Actual ICMA (also "ISMA" or "bond basis").
///
/// The fraction is measured against a coupon reference period: a full regular
/// coupon period is exactly `months / 12` of a year. Irregular first and last
/// periods are decomposed into notional regular periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIcma;

impl ActActIcma {
    fn fraction(start: Date, end: Date, ref_start: Date, ref_end: Date) -> f64 {
        if start == end {
            return 0.0;
        }
        if start > end {
            return -Self::fraction(end, start, ref_start, ref_end);
        }

        let fallback = || start.days_between(&end) as f64 / 365.0;

        let mut ref_start = ref_start;
        let mut ref_end = ref_end;
        let mut months =
            (12.0 * ref_start.days_between(&ref_end) as f64 / 365.0).round() as i32;
        if months == 0 {
            ref_start = start;
            let Ok(one_year_on) = start.add_years(1) else {
                return fallback();
            };
            ref_end = one_year_on;
            months = 12;
        }
        let period = f64::from(months) / 12.0;

        if end <= ref_end {
            if start >= ref_start {
                return period * start.days_between(&end) as f64
                    / ref_start.days_between(&ref_end) as f64;
            }

            // Long or short first period: measure the part before the
            // reference start against the notional period preceding it.
            let Ok(previous_ref) = ref_start.add_months(-months) else {
                return fallback();
            };
            if end > ref_start {
                return Self::fraction(start, ref_start, previous_ref, ref_start)
                    + Self::fraction(ref_start, end, ref_start, ref_end);
            }
            return Self::fraction(start, end, previous_ref, ref_start);
        }

        if ref_start > start {
            return fallback();
        }

        // Long final period: whole notional periods count `period` each.
        let mut sum = Self::fraction(start, ref_end, ref_start, ref_end);
        let mut i = 0;
        loop {
            let (Ok(new_ref_start), Ok(new_ref_end)) = (
                ref_end.add_months(months * i),
                ref_end.add_months(months * (i + 1)),
            ) else {
                return fallback();
            };
            if end < new_ref_end {
                return sum + Self::fraction(new_ref_start, end, new_ref_start, new_ref_end);
            }
            sum += period;
            i += 1;
        }
    }
}

impl DayCount for ActActIcma {
    fn name(&self) -> &'static str {
        "ACT/ACT ICMA"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        // the reference period is derived from the ordered dates
        if start > end {
            return -Self::fraction(end, start, end, start);
        }
        Self::fraction(start, end, start, end)
    }

    fn year_fraction_with_reference(
        &self,
        start: Date,
        end: Date,
        ref_start: Date,
        ref_end: Date,
    ) -> f64 {
        Self::fraction(start, end, ref_start, ref_end)
    }
}
