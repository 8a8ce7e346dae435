//! Interest rate futures.

use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;

use super::{simple_forward, validate_period, CurveInstrument, InstrumentType, SimpleAccrual};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// An interest rate future on `[start, end]`.
///
/// Quoted as a rate; [`RateFuture::from_price`] converts an IMM-style price
/// (`100 - rate × 100`). The convexity adjustment is added to the quoted
/// rate before it is used as the period's simple forward rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateFuture {
    start_date: Date,
    end_date: Date,
    rate: f64,
    convexity_adjustment: f64,
    day_count: DayCountConvention,
}

impl RateFuture {
    /// Creates a future from its quoted rate, accruing ACT/360.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> Self {
        Self {
            start_date,
            end_date,
            rate,
            convexity_adjustment: 0.0,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Creates a future from its price.
    pub fn from_price(start_date: Date, end_date: Date, price: f64) -> CurveResult<Self> {
        if !(price.is_finite() && price > 0.0) {
            return Err(CurveError::invalid_instrument(format!(
                "futures price {price} must be positive"
            )));
        }
        Ok(Self::new(start_date, end_date, 1.0 - price / 100.0))
    }

    /// Sets the convexity adjustment, in rate units.
    #[must_use]
    pub fn with_convexity_adjustment(mut self, adjustment: f64) -> Self {
        self.convexity_adjustment = adjustment;
        self
    }

    /// Sets the day count convention.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Checks the dates and rate.
    pub fn validate(&self) -> CurveResult<()> {
        validate_period(self.start_date, self.end_date, self.adjusted_rate())
    }

    /// Quoted rate plus convexity adjustment.
    #[must_use]
    pub fn adjusted_rate(&self) -> f64 {
        self.rate + self.convexity_adjustment
    }

    /// Futures price implied by the quoted rate.
    #[must_use]
    pub fn price(&self) -> f64 {
        100.0 * (1.0 - self.rate)
    }

    fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start_date, self.end_date)
    }
}

impl CurveInstrument for RateFuture {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Future
    }

    fn pillar_date(&self) -> Date {
        self.end_date
    }

    fn quote(&self) -> f64 {
        self.adjusted_rate()
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        simple_forward(curve, self.start_date, self.end_date, self.year_fraction())
    }

    fn simple_accrual(&self) -> Option<SimpleAccrual> {
        Some(SimpleAccrual {
            start: self.start_date,
            end: self.end_date,
            growth: 1.0 + self.adjusted_rate() * self.year_fraction(),
        })
    }

    fn description(&self) -> String {
        format!("Future {:.3} {} .. {}", self.price(), self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_price_conversion_and_adjustment() {
        let start = Date::from_ymd(2024, 3, 20).unwrap();
        let end = Date::from_ymd(2024, 6, 19).unwrap();
        let future = RateFuture::from_price(start, end, 95.25)
            .unwrap()
            .with_convexity_adjustment(0.0005);

        assert_relative_eq!(future.price(), 95.25, epsilon = 1e-12);
        assert_relative_eq!(future.quote(), 0.048, epsilon = 1e-12);

        let tau = 91.0 / 360.0;
        assert_relative_eq!(
            future.simple_accrual().unwrap().growth,
            1.0 + 0.048 * tau,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_rejects_bad_price() {
        let start = Date::from_ymd(2024, 3, 20).unwrap();
        let end = Date::from_ymd(2024, 6, 19).unwrap();
        assert!(RateFuture::from_price(start, end, 0.0).is_err());
    }
}
