//! Core trait for yield curves.
//!
//! [`Curve`] is what instruments price against: the curve under
//! construction during a bootstrap, and any exogenous discounting curve a
//! helper borrows from a sibling. Everything derives from discount factors.

use strata_core::daycounts::DayCountConvention;
use strata_core::types::{Compounding, Date, Frequency, InterestRate};

use crate::error::{CurveError, CurveResult};

/// The core trait for yield curves.
///
/// Implementations provide discount factors on the curve's own time axis
/// (year fractions from the reference date under the curve day counter) and
/// the instantaneous forward rate. Zero and forward rates in any convention
/// follow from those.
pub trait Curve: Send + Sync {
    /// The curve's reference (valuation) date; `P(reference) = 1`.
    fn reference_date(&self) -> Date;

    /// Day counter of the curve's time axis.
    fn day_counter(&self) -> DayCountConvention;

    /// Discount factor at curve time `t`.
    fn discount_t(&self, t: f64) -> CurveResult<f64>;

    /// Instantaneous forward rate at curve time `t`.
    fn instantaneous_forward_t(&self, t: f64) -> CurveResult<f64>;

    /// Curve time of `date`.
    fn time(&self, date: Date) -> f64 {
        self.day_counter().year_fraction(self.reference_date(), date)
    }

    /// Discount factor at `date`.
    fn discount(&self, date: Date) -> CurveResult<f64> {
        let reference = self.reference_date();
        if date < reference {
            return Err(CurveError::before_reference(date, reference));
        }
        self.discount_t(self.time(date))
    }

    /// Instantaneous forward rate at `date`.
    fn instantaneous_forward(&self, date: Date) -> CurveResult<f64> {
        let reference = self.reference_date();
        if date < reference {
            return Err(CurveError::before_reference(date, reference));
        }
        self.instantaneous_forward_t(self.time(date))
    }

    /// Zero rate to `date`, measured with `day_counter`.
    ///
    /// At the reference date itself the rate to the following day is
    /// returned.
    fn zero_rate(
        &self,
        date: Date,
        day_counter: DayCountConvention,
        compounding: Compounding,
        frequency: Frequency,
    ) -> CurveResult<InterestRate> {
        let reference = self.reference_date();
        let date = if date == reference {
            reference.add_days(1)
        } else {
            date
        };
        let df = self.discount(date)?;
        let t = day_counter.year_fraction(reference, date);
        Ok(InterestRate::implied_from_discount(
            df,
            t,
            compounding,
            frequency,
        )?)
    }

    /// Forward rate over `[start, end]`, measured with `day_counter`.
    fn forward_rate(
        &self,
        start: Date,
        end: Date,
        day_counter: DayCountConvention,
        compounding: Compounding,
        frequency: Frequency,
    ) -> CurveResult<InterestRate> {
        if end <= start {
            return Err(CurveError::invalid_value(format!(
                "forward period {start} .. {end} is empty"
            )));
        }
        let compound = self.discount(start)? / self.discount(end)?;
        let t = day_counter.year_fraction(start, end);
        Ok(InterestRate::implied_from_compound(
            compound,
            t,
            compounding,
            frequency,
        )?)
    }
}
