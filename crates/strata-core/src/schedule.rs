//! Schedule generation for coupon and fixing dates.
//!
//! A [`Schedule`] is the list of period boundaries of a leg: the first date is
//! the effective date, the last the termination date. Intermediate dates are
//! rolled a whole number of tenors from one end (backward from termination by
//! default), so a leg that does not divide evenly gets a stub at the opposite
//! end.
//!
//! # Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let schedule = ScheduleBuilder::new(
//!     Date::from_ymd(2005, 3, 15).unwrap(),
//!     Date::from_ymd(2010, 8, 31).unwrap(),
//! )
//! .frequency(Frequency::Semiannual)
//! .calendar(CalendarId::UnitedStatesGovernmentBond)
//! .convention(BusinessDayConvention::Unadjusted)
//! .build()
//! .unwrap();
//!
//! // Short first period 2005-03-15 .. 2005-08-31, then regular half years
//! assert_eq!(schedule.dates()[1], Date::from_ymd(2005, 8, 31).unwrap());
//! assert!(!schedule.is_regular(0));
//! assert!(schedule.is_regular(1));
//! ```

use serde::{Deserialize, Serialize};

use crate::calendars::{BusinessDayConvention, Calendar, CalendarId};
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency, Period};

/// Direction in which schedule dates are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateGeneration {
    /// Roll back from the termination date; any stub is at the front.
    #[default]
    Backward,
    /// Roll forward from the effective date; any stub is at the back.
    Forward,
    /// Effective and termination dates only.
    Zero,
}

/// Builder for a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    effective: Date,
    termination: Date,
    tenor: Option<Period>,
    calendar: CalendarId,
    convention: BusinessDayConvention,
    termination_convention: Option<BusinessDayConvention>,
    rule: DateGeneration,
    end_of_month: bool,
}

impl ScheduleBuilder {
    /// Starts a schedule between two dates.
    ///
    /// Defaults: annual tenor, null calendar, unadjusted, backward, no
    /// end-of-month rule.
    #[must_use]
    pub fn new(effective: Date, termination: Date) -> Self {
        Self {
            effective,
            termination,
            tenor: Some(Period::years(1)),
            calendar: CalendarId::NullCalendar,
            convention: BusinessDayConvention::Unadjusted,
            termination_convention: None,
            rule: DateGeneration::Backward,
            end_of_month: false,
        }
    }

    /// Sets the period between regular dates.
    #[must_use]
    pub fn tenor(mut self, tenor: Period) -> Self {
        self.tenor = Some(tenor);
        self
    }

    /// Sets the tenor from a frequency. [`Frequency::Once`] yields a zero schedule.
    #[must_use]
    pub fn frequency(mut self, frequency: Frequency) -> Self {
        self.tenor = frequency.period();
        if self.tenor.is_none() {
            self.rule = DateGeneration::Zero;
        }
        self
    }

    /// Sets the adjustment calendar.
    #[must_use]
    pub fn calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets the business day convention for every date but the last.
    #[must_use]
    pub fn convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the convention for the termination date (defaults to `convention`).
    #[must_use]
    pub fn termination_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.termination_convention = Some(convention);
        self
    }

    /// Sets the generation direction.
    #[must_use]
    pub fn rule(mut self, rule: DateGeneration) -> Self {
        self.rule = rule;
        self
    }

    /// Enables the end-of-month rule.
    #[must_use]
    pub fn end_of_month(mut self, end_of_month: bool) -> Self {
        self.end_of_month = end_of_month;
        self
    }

    /// Generates the schedule.
    pub fn build(self) -> CoreResult<Schedule> {
        if self.termination <= self.effective {
            return Err(CoreError::schedule_error(format!(
                "termination {} is not after effective date {}",
                self.termination, self.effective
            )));
        }

        let calendar = self.calendar.calendar();
        let convention = self.convention;
        let termination_convention = self.termination_convention.unwrap_or(convention);

        let tenor = match (self.rule, self.tenor) {
            (DateGeneration::Zero, _) | (_, None) => None,
            (_, Some(tenor)) if tenor.is_zero() || tenor.length() < 0 => {
                return Err(CoreError::schedule_error(format!(
                    "schedule tenor must be positive, got {tenor}"
                )));
            }
            (_, Some(tenor)) => Some(tenor),
        };

        let (unadjusted, regular) = match tenor {
            None => (vec![self.effective, self.termination], vec![true]),
            Some(tenor) => match self.rule {
                DateGeneration::Forward => self.roll_forward(tenor, calendar)?,
                _ => self.roll_backward(tenor, calendar)?,
            },
        };

        let eom_anchor = match self.rule {
            DateGeneration::Forward => self.effective,
            _ => self.termination,
        };
        let snap_to_month_end = self.end_of_month
            && tenor.is_some_and(|t| t.total_months().is_some())
            && eom_anchor.is_end_of_month();

        let last = unadjusted.len() - 1;
        let dates = unadjusted
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                if i == last {
                    calendar.adjust(date, termination_convention)
                } else if i > 0
                    && snap_to_month_end
                    && convention != BusinessDayConvention::Unadjusted
                {
                    calendar.last_business_day_of_month(date)
                } else {
                    calendar.adjust(date, convention)
                }
            })
            .collect();

        Ok(Schedule {
            dates,
            unadjusted,
            regular,
            tenor,
            calendar: self.calendar,
            convention,
        })
    }

    fn roll(&self, anchor: Date, tenor: Period, steps: i32) -> CoreResult<Date> {
        let date = (tenor * steps).add_to(anchor)?;
        if self.end_of_month && tenor.total_months().is_some() && anchor.is_end_of_month() {
            return Ok(date.end_of_month());
        }
        Ok(date)
    }

    fn roll_backward(
        &self,
        tenor: Period,
        calendar: &dyn Calendar,
    ) -> CoreResult<(Vec<Date>, Vec<bool>)> {
        let same_after_adjust =
            |a: Date, b: Date| calendar.adjust(a, self.convention) == calendar.adjust(b, self.convention);

        let mut dates = vec![self.termination];
        let mut regular = Vec::new();
        for i in 1.. {
            let date = self.roll(self.termination, tenor, -i)?;
            if date < self.effective {
                break;
            }
            if !same_after_adjust(dates[dates.len() - 1], date) {
                dates.push(date);
                regular.push(true);
            }
        }
        if !same_after_adjust(dates[dates.len() - 1], self.effective) {
            dates.push(self.effective);
            regular.push(false);
        }

        dates.reverse();
        regular.reverse();
        Ok((dates, regular))
    }

    fn roll_forward(
        &self,
        tenor: Period,
        calendar: &dyn Calendar,
    ) -> CoreResult<(Vec<Date>, Vec<bool>)> {
        let same_after_adjust =
            |a: Date, b: Date| calendar.adjust(a, self.convention) == calendar.adjust(b, self.convention);

        let mut dates = vec![self.effective];
        let mut regular = Vec::new();
        for i in 1.. {
            let date = self.roll(self.effective, tenor, i)?;
            if date > self.termination {
                break;
            }
            if !same_after_adjust(dates[dates.len() - 1], date) {
                dates.push(date);
                regular.push(true);
            }
        }
        if !same_after_adjust(dates[dates.len() - 1], self.termination) {
            dates.push(self.termination);
            regular.push(false);
        }
        Ok((dates, regular))
    }
}

/// A generated schedule: adjusted and unadjusted period boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    dates: Vec<Date>,
    unadjusted: Vec<Date>,
    regular: Vec<bool>,
    tenor: Option<Period>,
    calendar: CalendarId,
    convention: BusinessDayConvention,
}

impl Schedule {
    /// Adjusted schedule dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Schedule dates before business day adjustment.
    #[must_use]
    pub fn unadjusted_dates(&self) -> &[Date] {
        &self.unadjusted
    }

    /// Number of dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the schedule has no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.len() < 2
    }

    /// Number of periods.
    #[must_use]
    pub fn num_periods(&self) -> usize {
        self.dates.len().saturating_sub(1)
    }

    /// Adjusted `(start, end)` pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Whether period `i` spans exactly one tenor.
    #[must_use]
    pub fn is_regular(&self, i: usize) -> bool {
        self.regular.get(i).copied().unwrap_or(true)
    }

    /// Regular tenor, `None` for a zero schedule.
    #[must_use]
    pub fn tenor(&self) -> Option<Period> {
        self.tenor
    }

    /// First (effective) date, adjusted.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.dates[0]
    }

    /// Last (termination) date, adjusted.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Calendar used for adjustment.
    #[must_use]
    pub fn calendar(&self) -> CalendarId {
        self.calendar
    }

    /// Business day convention used for adjustment.
    #[must_use]
    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Notional reference period of period `i`, for ACT/ACT ICMA accrual.
    ///
    /// A regular period is its own reference. An irregular first period is
    /// measured against the tenor ending at its end date, an irregular last
    /// period against the tenor starting at its start date.
    pub fn reference_period(&self, i: usize) -> CoreResult<(Date, Date)> {
        let (start, end) = self.periods().nth(i).ok_or_else(|| {
            CoreError::schedule_error(format!("period {i} out of range"))
        })?;
        let Some(tenor) = self.tenor else {
            return Ok((start, end));
        };
        if self.is_regular(i) {
            return Ok((start, end));
        }

        let calendar = self.calendar.calendar();
        if i == 0 {
            let ref_start = calendar.advance(end, -tenor, self.convention, false)?;
            Ok((ref_start, end))
        } else {
            let ref_end = calendar.advance(start, tenor, self.convention, false)?;
            Ok((start, ref_end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_semiannual_regular() {
        let schedule = ScheduleBuilder::new(d(2020, 1, 15), d(2025, 1, 15))
            .frequency(Frequency::Semiannual)
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 11);
        assert_eq!(schedule.num_periods(), 10);
        assert!((0..10).all(|i| schedule.is_regular(i)));
    }

    #[test]
    fn test_backward_rolls_from_termination_without_drift() {
        // 31 August rolls back to 28 February and returns to 31 August
        let schedule = ScheduleBuilder::new(d(2005, 3, 15), d(2010, 8, 31))
            .frequency(Frequency::Semiannual)
            .build()
            .unwrap();
        let dates = schedule.dates();
        assert_eq!(dates[0], d(2005, 3, 15));
        assert_eq!(dates[1], d(2005, 8, 31));
        assert_eq!(dates[2], d(2006, 2, 28));
        assert_eq!(dates[3], d(2006, 8, 31));
        assert_eq!(schedule.end_date(), d(2010, 8, 31));
        assert!(!schedule.is_regular(0));

        let (ref_start, ref_end) = schedule.reference_period(0).unwrap();
        assert_eq!(ref_start, d(2005, 2, 28));
        assert_eq!(ref_end, d(2005, 8, 31));
    }

    #[test]
    fn test_forward_generation_has_back_stub() {
        let schedule = ScheduleBuilder::new(d(2020, 1, 15), d(2021, 3, 1))
            .frequency(Frequency::Semiannual)
            .rule(DateGeneration::Forward)
            .build()
            .unwrap();
        assert_eq!(
            schedule.dates(),
            &[d(2020, 1, 15), d(2020, 7, 15), d(2021, 1, 15), d(2021, 3, 1)]
        );
        assert!(!schedule.is_regular(2));
        assert_eq!(
            schedule.reference_period(2).unwrap(),
            (d(2021, 1, 15), d(2021, 7, 15))
        );
    }

    #[test]
    fn test_adjustment_and_termination_convention() {
        // 2011-05-15 and 2010-11-15 are not both business days
        let schedule = ScheduleBuilder::new(d(2009, 5, 15), d(2011, 5, 15))
            .frequency(Frequency::Semiannual)
            .calendar(CalendarId::UnitedStatesGovernmentBond)
            .convention(BusinessDayConvention::Following)
            .termination_convention(BusinessDayConvention::Unadjusted)
            .build()
            .unwrap();
        assert_eq!(schedule.unadjusted_dates()[1], d(2009, 11, 15));
        assert_eq!(schedule.dates()[1], d(2009, 11, 16));
        assert_eq!(schedule.end_date(), d(2011, 5, 15));
    }

    #[test]
    fn test_end_of_month_rule() {
        let schedule = ScheduleBuilder::new(d(2008, 2, 29), d(2009, 2, 28))
            .frequency(Frequency::Quarterly)
            .rule(DateGeneration::Forward)
            .end_of_month(true)
            .build()
            .unwrap();
        assert_eq!(schedule.dates()[1], d(2008, 5, 31));
        assert_eq!(schedule.dates()[2], d(2008, 8, 31));
    }

    #[test]
    fn test_zero_schedule() {
        let schedule = ScheduleBuilder::new(d(2020, 1, 15), d(2025, 1, 15))
            .frequency(Frequency::Once)
            .build()
            .unwrap();
        assert_eq!(schedule.dates(), &[d(2020, 1, 15), d(2025, 1, 15)]);
        assert_eq!(schedule.tenor(), None);
    }

    #[test]
    fn test_rejects_inverted_dates() {
        assert!(ScheduleBuilder::new(d(2025, 1, 15), d(2020, 1, 15)).build().is_err());
    }
}
