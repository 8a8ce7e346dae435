//! United States calendars.

use chrono::Weekday;

use super::rules::{is_easter_offset, is_observed_fixed, last_weekday, nth_weekday};
use super::Calendar;
use crate::types::Date;

fn is_nth_weekday(date: Date, month: u32, weekday: Weekday, n: u32) -> bool {
    date.month() == month && nth_weekday(date.year(), month, weekday, n) == Some(date)
}

fn is_last_weekday(date: Date, month: u32, weekday: Weekday) -> bool {
    date.month() == month && last_weekday(date.year(), month, weekday) == Some(date)
}

/// Federal holidays shared by both US calendars, excluding New Year's Day.
fn is_federal_holiday(date: Date) -> bool {
    let y = date.year();
    (y >= 1983 && is_nth_weekday(date, 1, Weekday::Mon, 3))
        || is_nth_weekday(date, 2, Weekday::Mon, 3)
        || is_last_weekday(date, 5, Weekday::Mon)
        || (y >= 2022 && is_observed_fixed(date, 6, 19))
        || is_observed_fixed(date, 7, 4)
        || is_nth_weekday(date, 9, Weekday::Mon, 1)
        || is_nth_weekday(date, 10, Weekday::Mon, 2)
        || is_nth_weekday(date, 11, Weekday::Thu, 4)
        || is_observed_fixed(date, 12, 25)
}

/// US government bond market calendar (SIFMA recommendation).
///
/// New Year's Day falling on a Saturday is not observed on the preceding
/// Friday; Veterans Day on a Saturday is not moved either. Good Friday is a
/// full holiday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitedStatesGovernmentBond;

impl Calendar for UnitedStatesGovernmentBond {
    fn name(&self) -> &'static str {
        "US government bond market"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        let (m, d, w) = (date.month(), date.day(), date.weekday());
        let new_year = m == 1 && (d == 1 || (d == 2 && w == Weekday::Mon));
        let veterans = m == 11 && (d == 11 || (d == 12 && w == Weekday::Mon));
        !(new_year || veterans || is_easter_offset(date, -2) || is_federal_holiday(date))
    }
}

/// US settlement calendar (Federal Reserve holidays).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitedStatesSettlement;

impl Calendar for UnitedStatesSettlement {
    fn name(&self) -> &'static str {
        "US settlement"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }
        let (m, d, w) = (date.month(), date.day(), date.weekday());
        let new_year = (m == 1 && (d == 1 || (d == 2 && w == Weekday::Mon)))
            || (m == 12 && d == 31 && w == Weekday::Fri);
        !(new_year || is_observed_fixed(date, 11, 11) || is_federal_holiday(date))
    }
}
