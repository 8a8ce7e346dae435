//! Date rules shared by the holiday calendars.

use chrono::Weekday;

use crate::types::{days_in_month, Date};

/// Saturday holidays are observed on Friday, Sunday holidays on Monday.
pub(crate) fn observed(date: Date) -> Date {
    match date.weekday() {
        Weekday::Sat => date.add_days(-1),
        Weekday::Sun => date.add_days(1),
        _ => date,
    }
}

/// True when `date` is the observed date of the fixed holiday `month/day`
/// in the same year.
pub(crate) fn is_observed_fixed(date: Date, month: u32, day: u32) -> bool {
    Date::from_ymd(date.year(), month, day).is_ok_and(|holiday| observed(holiday) == date)
}

/// The `n`th (1-based) occurrence of `weekday` in a month.
pub(crate) fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<Date> {
    let first = Date::from_ymd(year, month, 1).ok()?;
    let offset = (weekday.num_days_from_monday() as i64
        - first.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    let day = 1 + offset as u32 + (n - 1) * 7;
    Date::from_ymd(year, month, day).ok()
}

/// The last occurrence of `weekday` in a month.
pub(crate) fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<Date> {
    let last = Date::from_ymd(year, month, days_in_month(year, month)).ok()?;
    let back = (last.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64)
        .rem_euclid(7);
    Some(last.add_days(-back))
}

/// Easter Sunday (anonymous Gregorian algorithm).
#[allow(clippy::many_single_char_names)]
pub(crate) fn easter_sunday(year: i32) -> Option<Date> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;

    Date::from_ymd(year, month as u32, day as u32).ok()
}

/// True when `date` lies `offset` days from Easter Sunday of its year.
pub(crate) fn is_easter_offset(date: Date, offset: i64) -> bool {
    easter_sunday(date.year()).is_some_and(|easter| easter.add_days(offset) == date)
}
