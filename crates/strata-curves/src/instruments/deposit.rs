//! Money market deposit instrument.
//!
//! A deposit is the simplest instrument for curve bootstrap,
//! used for the short end of the curve (O/N to 12M).

use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;

use super::{simple_forward, validate_period, CurveInstrument, InstrumentType, SimpleAccrual};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A money market deposit.
///
/// # Pricing Formula
///
/// The deposit is priced at par when:
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
/// where τ is the year fraction under the deposit's day count.
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    start_date: Date,
    end_date: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a deposit accruing ACT/360.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> Self {
        Self {
            start_date,
            end_date,
            rate,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Checks the dates and rate.
    pub fn validate(&self) -> CurveResult<()> {
        validate_period(self.start_date, self.end_date, self.rate)
    }

    /// Returns the start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the end date (maturity).
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Returns the deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the year fraction for the deposit period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start_date, self.end_date)
    }
}

impl CurveInstrument for Deposit {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Deposit
    }

    fn pillar_date(&self) -> Date {
        self.end_date
    }

    fn quote(&self) -> f64 {
        self.rate
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        simple_forward(curve, self.start_date, self.end_date, self.year_fraction())
    }

    fn simple_accrual(&self) -> Option<SimpleAccrual> {
        Some(SimpleAccrual {
            start: self.start_date,
            end: self.end_date,
            growth: 1.0 + self.rate * self.year_fraction(),
        })
    }

    fn description(&self) -> String {
        format!(
            "Deposit {:.4}% {} .. {}",
            self.rate * 100.0,
            self.start_date,
            self.end_date
        )
    }
}
