//! TARGET calendar for euro payments and settlement.

use chrono::Weekday;

use super::rules::is_easter_offset;
use super::Calendar;
use crate::types::Date;

/// TARGET (Trans-European Automated Real-time Gross settlement Express
/// Transfer) calendar.
///
/// ## Holidays
///
/// - New Year's Day (January 1)
/// - Good Friday and Easter Monday (from 2000)
/// - Labour Day (May 1, from 2000)
/// - Christmas Day (December 25)
/// - December 26 (from 2000)
/// - December 31 in 1998, 1999 and 2001
///
/// Holidays falling on a weekend are not moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target;

impl Calendar for Target {
    fn name(&self) -> &'static str {
        "TARGET"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let (y, m, d) = (date.year(), date.month(), date.day());
        let holiday = (m == 1 && d == 1)
            || (y >= 2000 && (is_easter_offset(date, -2) || is_easter_offset(date, 1)))
            || (y >= 2000 && m == 5 && d == 1)
            || (m == 12 && d == 25)
            || (y >= 2000 && m == 12 && d == 26)
            || (m == 12 && d == 31 && matches!(y, 1998 | 1999 | 2001));
        !holiday
    }
}
