//! Interest rate swap instrument.

use std::sync::Arc;

use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::Schedule;
use strata_core::types::Date;

use super::{accrual_periods, annuity, simple_forward, AccrualPeriod, CurveInstrument, InstrumentType};
use crate::curves::PiecewiseCurve;
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// One period of the floating leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPeriod {
    /// Accrual dates, payment date and accrual fraction.
    pub accrual: AccrualPeriod,
    /// Index fixing, when already known.
    pub fixing: Option<f64>,
}

/// A vanilla fixed-for-floating swap.
///
/// The float leg projects simple forwards over its accrual periods on the
/// curve being built. Both legs are discounted on that same curve, or on an
/// exogenous discount curve when one is attached.
///
/// # Pricing Formula
///
/// ```text
/// S = Σ (F_i + spread) × τ_i × DF(T_i)  /  Σ τ_j × DF(T_j)
/// ```
#[derive(Debug, Clone)]
pub struct Swap {
    rate: f64,
    spread: f64,
    fixed_periods: Vec<AccrualPeriod>,
    float_periods: Vec<FloatPeriod>,
    discount_curve: Option<Arc<PiecewiseCurve>>,
}

impl Swap {
    /// Creates a swap from its leg schedules.
    pub fn new(
        rate: f64,
        fixed_schedule: &Schedule,
        fixed_day_count: DayCountConvention,
        float_schedule: &Schedule,
        float_day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        let fixed_periods = accrual_periods(fixed_schedule, fixed_day_count);
        let float_periods: Vec<FloatPeriod> = accrual_periods(float_schedule, float_day_count)
            .into_iter()
            .map(|accrual| FloatPeriod {
                accrual,
                fixing: None,
            })
            .collect();

        if fixed_periods.is_empty() || float_periods.is_empty() {
            return Err(CurveError::invalid_instrument("swap leg without periods"));
        }
        if !rate.is_finite() {
            return Err(CurveError::invalid_instrument(format!("swap rate {rate} is not finite")));
        }

        Ok(Self {
            rate,
            spread: 0.0,
            fixed_periods,
            float_periods,
            discount_curve: None,
        })
    }

    /// Adds a spread over the floating index.
    #[must_use]
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Discounts both legs on `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: Arc<PiecewiseCurve>) -> Self {
        self.discount_curve = Some(curve);
        self
    }

    /// Uses a known fixing for float period `index`.
    #[must_use]
    pub fn with_fixing(mut self, index: usize, fixing: f64) -> Self {
        if let Some(period) = self.float_periods.get_mut(index) {
            period.fixing = Some(fixing);
        }
        self
    }

    /// Swap start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.fixed_periods[0].start
    }

    /// Swap maturity.
    #[must_use]
    pub fn maturity(&self) -> Date {
        let fixed_end = self.fixed_periods[self.fixed_periods.len() - 1].end;
        let float_end = self.float_periods[self.float_periods.len() - 1].accrual.end;
        fixed_end.max(float_end)
    }

    /// Fixed leg periods.
    #[must_use]
    pub fn fixed_periods(&self) -> &[AccrualPeriod] {
        &self.fixed_periods
    }

    /// Floating leg periods.
    #[must_use]
    pub fn float_periods(&self) -> &[FloatPeriod] {
        &self.float_periods
    }

    /// The exogenous discount curve, if any.
    #[must_use]
    pub fn discount_curve(&self) -> Option<&Arc<PiecewiseCurve>> {
        self.discount_curve.as_ref()
    }

    /// Present value of the floating leg per unit notional.
    pub fn float_leg_pv(&self, projection: &dyn Curve, discount: &dyn Curve) -> CurveResult<f64> {
        self.float_periods.iter().try_fold(0.0, |acc, period| {
            let p = &period.accrual;
            let forward = match period.fixing {
                Some(fixing) => fixing,
                None => simple_forward(projection, p.start, p.end, p.year_fraction)?,
            };
            Ok(acc + (forward + self.spread) * p.year_fraction * discount.discount(p.payment)?)
        })
    }
}

impl CurveInstrument for Swap {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Swap
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
        let annuity = annuity(&self.fixed_periods, discount)?;
        if annuity <= 0.0 {
            return Err(CurveError::invalid_value(format!("swap annuity {annuity}")));
        }
        Ok(self.float_leg_pv(curve, discount)? / annuity)
    }

    fn description(&self) -> String {
        format!("Swap {:.4}% {} .. {}", self.rate * 100.0, self.start_date(), self.maturity())
    }
}
