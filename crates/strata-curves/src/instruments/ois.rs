//! Overnight Indexed Swap instrument.

use std::sync::Arc;

use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::Schedule;
use strata_core::types::Date;

use super::{accrual_periods, annuity, AccrualPeriod, CurveInstrument, InstrumentType};
use crate::curves::PiecewiseCurve;
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// An Overnight Indexed Swap.
///
/// The overnight leg compounds daily, so over each fixed period it pays
/// `DF(start)/DF(end) - 1` under the projection curve. Both legs accrue with
/// the overnight index's day counter.
///
/// # Pricing Formula
///
/// ```text
/// S = Σ (DF(s_i)/DF(e_i) - 1) × P(T_i)  /  Σ τ_i × P(T_i)
/// ```
/// where `DF` projects and `P` discounts; on a single curve the numerator
/// collapses to `DF(start) - DF(end)`.
#[derive(Debug, Clone)]
pub struct OvernightIndexedSwap {
    rate: f64,
    periods: Vec<AccrualPeriod>,
    discount_curve: Option<Arc<PiecewiseCurve>>,
}

impl OvernightIndexedSwap {
    /// Creates an OIS paying on `schedule`.
    pub fn new(rate: f64, schedule: &Schedule, day_count: DayCountConvention) -> CurveResult<Self> {
        let periods = accrual_periods(schedule, day_count);
        if periods.is_empty() {
            return Err(CurveError::invalid_instrument("OIS without periods"));
        }
        if !rate.is_finite() {
            return Err(CurveError::invalid_instrument(format!("OIS rate {rate} is not finite")));
        }
        Ok(Self {
            rate,
            periods,
            discount_curve: None,
        })
    }

    /// Discounts on `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: Arc<PiecewiseCurve>) -> Self {
        self.discount_curve = Some(curve);
        self
    }

    /// Start of the first period.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.periods[0].start
    }

    /// End of the last period.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.periods[self.periods.len() - 1].end
    }

    /// Accrual periods.
    #[must_use]
    pub fn periods(&self) -> &[AccrualPeriod] {
        &self.periods
    }

    /// Present value of the overnight leg per unit notional.
    pub fn overnight_leg_pv(
        &self,
        projection: &dyn Curve,
        discount: &dyn Curve,
    ) -> CurveResult<f64> {
        self.periods.iter().try_fold(0.0, |acc, p| {
            let compounded = projection.discount(p.start)? / projection.discount(p.end)? - 1.0;
            Ok(acc + compounded * discount.discount(p.payment)?)
        })
    }
}

impl CurveInstrument for OvernightIndexedSwap {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Ois
    }

    fn pillar_date(&self) -> Date {
        self.maturity()
    }

    fn quote(&self) -> f64 {
        self.rate
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let discount: &dyn Curve = match &self.discount_curve {
            Some(exogenous) => &**exogenous,
            None => curve,
        };
        let annuity = annuity(&self.periods, discount)?;
        if annuity <= 0.0 {
            return Err(CurveError::invalid_value(format!("OIS annuity {annuity}")));
        }
        Ok(self.overnight_leg_pv(curve, discount)? / annuity)
    }

    fn description(&self) -> String {
        format!("OIS {:.4}% {} .. {}", self.rate * 100.0, self.start_date(), self.maturity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveSettings;
    use approx::assert_relative_eq;
    use strata_core::calendars::{BusinessDayConvention, CalendarId};
    use strata_core::schedule::ScheduleBuilder;
    use strata_core::types::Frequency;

    #[test]
    fn test_single_curve_numerator_telescopes() {
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let start = Date::from_ymd(2024, 1, 4).unwrap();
        let end = Date::from_ymd(2027, 1, 4).unwrap();
        let schedule = ScheduleBuilder::new(start, end)
            .frequency(Frequency::Annual)
            .calendar(CalendarId::Target)
            .convention(BusinessDayConvention::ModifiedFollowing)
            .build()
            .unwrap();
        let ois = OvernightIndexedSwap::new(0.03, &schedule, DayCountConvention::Act360).unwrap();

        let far = Date::from_ymd(2035, 1, 2).unwrap();
        let settings = CurveSettings::new(reference);
        let curve =
            PiecewiseCurve::new(settings, &[(far, (-0.03 * settings.time(far)).exp())]).unwrap();

        let leg = ois.overnight_leg_pv(&curve, &curve).unwrap();
        let expected = curve.discount(start).unwrap() - curve.discount(end).unwrap();
        assert_relative_eq!(leg, expected, epsilon = 1e-14);
        assert_eq!(ois.pillar_date(), end);
    }
}
