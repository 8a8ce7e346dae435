//! Forward Rate Agreement instrument.

use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;

use super::{simple_forward, validate_period, CurveInstrument, InstrumentType, SimpleAccrual};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A Forward Rate Agreement on `[start, end]`.
///
/// At par the quoted rate equals the simple forward rate:
/// ```text
/// DF(end) = DF(start) / (1 + F × τ)
/// ```
/// The pillar is the end date. When the start date falls after the previous
/// pillar, the bootstrapper root-finds instead of using the closed form.
#[derive(Debug, Clone, PartialEq)]
pub struct Fra {
    start_date: Date,
    end_date: Date,
    rate: f64,
    day_count: DayCountConvention,
}

impl Fra {
    /// Creates a FRA accruing ACT/360.
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

    /// Returns the end date.
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start_date, self.end_date)
    }
}

impl CurveInstrument for Fra {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Fra
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
            "FRA {:.4}% {} .. {}",
            self.rate * 100.0,
            self.start_date,
            self.end_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{CurveSettings, PiecewiseCurve};
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_rate_from_curve() {
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let start = Date::from_ymd(2024, 4, 2).unwrap();
        let end = Date::from_ymd(2024, 7, 2).unwrap();
        let curve =
            PiecewiseCurve::new(CurveSettings::new(reference), &[(start, 0.99), (end, 0.98)])
                .unwrap();

        let fra = Fra::new(start, end, 0.04);
        let tau = 91.0 / 360.0;
        let expected = (0.99 / 0.98 - 1.0) / tau;
        assert_relative_eq!(fra.implied_quote(&curve).unwrap(), expected, epsilon = 1e-12);

        let accrual = fra.simple_accrual().unwrap();
        assert_eq!(accrual.start, start);
        assert_relative_eq!(accrual.growth, 1.0 + 0.04 * tau, epsilon = 1e-15);
    }
}
