//! United Kingdom settlement calendar.

use chrono::Weekday;

use super::rules::{is_easter_offset, last_weekday, nth_weekday};
use super::Calendar;
use crate::types::Date;

/// UK settlement calendar (England and Wales bank holidays).
///
/// Weekend Christmas, Boxing Day and New Year holidays roll to the next
/// weekdays. Royal and jubilee one-off holidays are not modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitedKingdom;

impl Calendar for UnitedKingdom {
    fn name(&self) -> &'static str {
        "UK settlement"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        let (y, m, d, w) = (date.year(), date.month(), date.day(), date.weekday());
        let monday_or_tuesday = matches!(w, Weekday::Mon | Weekday::Tue);

        let holiday = (m == 1 && (d == 1 || ((d == 2 || d == 3) && w == Weekday::Mon)))
            || is_easter_offset(date, -2)
            || is_easter_offset(date, 1)
            || nth_weekday(y, 5, Weekday::Mon, 1) == Some(date)
            || last_weekday(y, 5, Weekday::Mon) == Some(date)
            || last_weekday(y, 8, Weekday::Mon) == Some(date)
            || (m == 12 && (d == 25 || (d == 27 && monday_or_tuesday)))
            || (m == 12 && (d == 26 || (d == 28 && monday_or_tuesday)));
        !holiday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_uk_bank_holidays_2009() {
        for holiday in [
            d(2009, 1, 1),
            d(2009, 4, 10),
            d(2009, 4, 13),
            d(2009, 5, 4),
            d(2009, 5, 25),
            d(2009, 8, 31),
            d(2009, 12, 25),
            d(2009, 12, 28),
        ] {
            assert!(UnitedKingdom.is_holiday(holiday), "{holiday} should be a holiday");
        }
    }

    #[test]
    fn test_weekend_christmas_rolls() {
        // 2010-12-25 Saturday, 26 Sunday: observed Monday 27 and Tuesday 28
        assert!(UnitedKingdom.is_holiday(d(2010, 12, 27)));
        assert!(UnitedKingdom.is_holiday(d(2010, 12, 28)));
        assert!(UnitedKingdom.is_business_day(d(2010, 12, 29)));
    }
}
