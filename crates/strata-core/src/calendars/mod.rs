//! Business day calendars and conventions.
//!
//! This module provides:
//! - Rule-based holiday calendars (TARGET, US, UK, weekends-only, null)
//! - Business day adjustment conventions
//! - Tenor arithmetic on business days, with the end-of-month rule
//!
//! Requests name calendars through [`CalendarId`]; each id resolves to a
//! static, zero-sized implementation of [`Calendar`].

mod conventions;
mod rules;
mod simple;
mod target;
mod united_kingdom;
mod united_states;

pub use conventions::{adjust, BusinessDayConvention};
pub use simple::{NullCalendar, WeekendsOnly};
pub use target::Target;
pub use united_kingdom::UnitedKingdom;
pub use united_states::{UnitedStatesGovernmentBond, UnitedStatesSettlement};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreResult;
use crate::types::{Date, Period, TimeUnit};

/// Trait for business day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a weekend day or holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Moves `date` by `days` business days. Zero returns the date unchanged.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Advances `date` by a period.
    ///
    /// A day period moves by business days (a zero period adjusts the date).
    /// Week, month and year periods move in calendar time and then adjust.
    /// With `end_of_month` set, a start on the last business day of its month
    /// lands on the last business day of the target month.
    fn advance(
        &self,
        date: Date,
        period: Period,
        convention: BusinessDayConvention,
        end_of_month: bool,
    ) -> CoreResult<Date> {
        match period.unit() {
            TimeUnit::Days if period.is_zero() => Ok(self.adjust(date, convention)),
            TimeUnit::Days => Ok(self.add_business_days(date, period.length())),
            TimeUnit::Weeks => Ok(self.adjust(period.add_to(date)?, convention)),
            TimeUnit::Months | TimeUnit::Years => {
                let moved = period.add_to(date)?;
                if end_of_month && self.is_last_business_day_of_month(date) {
                    return Ok(self.last_business_day_of_month(moved));
                }
                Ok(self.adjust(moved, convention))
            }
        }
    }

    /// True if `date` is the last business day of its month.
    fn is_last_business_day_of_month(&self, date: Date) -> bool {
        let next = self.adjust(date.add_days(1), BusinessDayConvention::Following);
        next.month() != date.month()
    }

    /// The last business day of the month containing `date`.
    fn last_business_day_of_month(&self, date: Date) -> Date {
        self.adjust(date.end_of_month(), BusinessDayConvention::Preceding)
    }

    /// Counts business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);
        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }
        count
    }
}

/// Calendar selector used in requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarId {
    /// No holidays at all.
    NullCalendar,
    /// Weekends only.
    WeekendsOnly,
    /// TARGET (euro).
    #[default]
    #[serde(alias = "TARGET", alias = "Target2")]
    Target,
    /// US government bond market.
    #[serde(alias = "UsGovernmentBond")]
    UnitedStatesGovernmentBond,
    /// US settlement.
    #[serde(alias = "UsSettlement")]
    UnitedStatesSettlement,
    /// UK settlement.
    #[serde(alias = "Uk")]
    UnitedKingdom,
}

static NULL: NullCalendar = NullCalendar;
static WEEKENDS_ONLY: WeekendsOnly = WeekendsOnly;
static TARGET: Target = Target;
static US_GOVERNMENT_BOND: UnitedStatesGovernmentBond = UnitedStatesGovernmentBond;
static US_SETTLEMENT: UnitedStatesSettlement = UnitedStatesSettlement;
static UNITED_KINGDOM: UnitedKingdom = UnitedKingdom;

impl CalendarId {
    /// The calendar behind this id.
    #[must_use]
    pub fn calendar(&self) -> &'static dyn Calendar {
        match self {
            CalendarId::NullCalendar => &NULL,
            CalendarId::WeekendsOnly => &WEEKENDS_ONLY,
            CalendarId::Target => &TARGET,
            CalendarId::UnitedStatesGovernmentBond => &US_GOVERNMENT_BOND,
            CalendarId::UnitedStatesSettlement => &US_SETTLEMENT,
            CalendarId::UnitedKingdom => &UNITED_KINGDOM,
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.calendar().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_add_business_days_skips_weekend() {
        let cal = CalendarId::Target.calendar();
        // Monday 2008-09-15 plus three business days
        assert_eq!(cal.add_business_days(d(2008, 9, 15), 3), d(2008, 9, 18));
        // Friday 2008-09-19 plus one
        assert_eq!(cal.add_business_days(d(2008, 9, 19), 1), d(2008, 9, 22));
        assert_eq!(cal.add_business_days(d(2008, 9, 22), -1), d(2008, 9, 19));
        assert_eq!(cal.add_business_days(d(2008, 9, 20), 0), d(2008, 9, 20));
    }

    #[test]
    fn test_advance_months_modified_following() {
        let cal = CalendarId::Target.calendar();
        let spot = d(2008, 9, 18);
        let mf = BusinessDayConvention::ModifiedFollowing;
        assert_eq!(cal.advance(spot, Period::months(3), mf, true).unwrap(), d(2008, 12, 18));
        assert_eq!(cal.advance(spot, Period::months(6), mf, true).unwrap(), d(2009, 3, 18));
        assert_eq!(cal.advance(spot, Period::years(1), mf, true).unwrap(), d(2009, 9, 18));
    }

    #[test]
    fn test_advance_end_of_month() {
        let cal = CalendarId::WeekendsOnly.calendar();
        let mf = BusinessDayConvention::ModifiedFollowing;
        // 2009-02-27 is the last business day of February
        let start = d(2009, 2, 27);
        assert_eq!(cal.advance(start, Period::months(1), mf, true).unwrap(), d(2009, 3, 31));
        assert_eq!(cal.advance(start, Period::months(1), mf, false).unwrap(), d(2009, 3, 27));
    }

    #[test]
    fn test_advance_days_and_weeks() {
        let cal = CalendarId::Target.calendar();
        let f = BusinessDayConvention::Following;
        assert_eq!(cal.advance(d(2008, 9, 18), Period::days(1), f, false).unwrap(), d(2008, 9, 19));
        assert_eq!(cal.advance(d(2008, 9, 18), Period::weeks(1), f, false).unwrap(), d(2008, 9, 25));
        assert_eq!(cal.advance(d(2008, 9, 20), Period::days(0), f, false).unwrap(), d(2008, 9, 22));
    }

    #[test]
    fn test_business_days_between() {
        let cal = CalendarId::WeekendsOnly.calendar();
        assert_eq!(cal.business_days_between(d(2025, 1, 3), d(2025, 1, 10)), 5);
    }

    #[test]
    fn test_calendar_id_serde() {
        let id: CalendarId = serde_json::from_str("\"TARGET\"").unwrap();
        assert_eq!(id, CalendarId::Target);
        let id: CalendarId = serde_json::from_str("\"UnitedStatesGovernmentBond\"").unwrap();
        assert_eq!(id.calendar().name(), "US government bond market");
    }
}
