//! 30/360 day count conventions.

use super::DayCount;
use crate::types::Date;

fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

fn thirty_360_days(start: Date, end: Date, d1: i64, d2: i64) -> i64 {
    let years = i64::from(end.year() - start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    360 * years + 30 * months + (d2 - d1)
}

/// 30/360 US (bond basis), with the February end-of-month rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360Us;

impl DayCount for Thirty360Us {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());
        let start_feb_eom = is_last_day_of_february(start);

        if start_feb_eom || d1 == 31 {
            d1 = 30;
        }
        if (start_feb_eom && is_last_day_of_february(end)) || (d2 == 31 && d1 >= 30) {
            d2 = 30;
        }

        thirty_360_days(start, end, d1, d2)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }
}

/// 30E/360 (Eurobond basis): both day-of-month values are capped at 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360European;

impl DayCount for Thirty360European {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = i64::from(start.day()).min(30);
        let d2 = i64::from(end.day()).min(30);
        thirty_360_days(start, end, d1, d2)
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_us_month_end_rules() {
        assert_eq!(Thirty360Us.day_count(d(2024, 1, 31), d(2024, 3, 31)), 60);
        assert_eq!(Thirty360Us.day_count(d(2024, 1, 15), d(2024, 3, 31)), 76);
        assert_eq!(Thirty360Us.day_count(d(2023, 2, 28), d(2023, 8, 31)), 180);
        assert_eq!(Thirty360Us.day_count(d(2023, 2, 28), d(2024, 2, 29)), 360);
    }

    #[test]
    fn test_european_caps_both_ends() {
        assert_eq!(Thirty360European.day_count(d(2024, 1, 15), d(2024, 3, 31)), 75);
        assert_eq!(Thirty360European.day_count(d(2024, 2, 29), d(2024, 8, 31)), 181);
    }
}
