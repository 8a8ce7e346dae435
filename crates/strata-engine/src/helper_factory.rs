//! Turns helper declarations into calibration instruments.
//!
//! Every date is anchored on the evaluation date. Swap and OIS helpers that
//! discount off another curve receive it from the [`CurveRegistry`]; the
//! resolver guarantees it was built before this curve is scheduled.

use std::sync::Arc;

use strata_core::schedule::{DateGeneration, Schedule, ScheduleBuilder};
use strata_core::types::Period;
use strata_curves::{
    CalibrationInstrument, Deposit, FixedRateBond, Fra, OvernightIndexedSwap, PiecewiseCurve,
    RateFuture, Swap,
};

use crate::context::EvaluationContext;
use crate::contracts::{
    BondSpec, DepositSpec, FraSpec, FutureSpec, HelperSpec, OisSpec, ScheduleSpec, SwapSpec,
};
use crate::error::{EngineError, EngineResult};
use crate::index_registry::IndexKind;
use crate::registry::CurveRegistry;

/// Builds the instruments of one curve.
#[derive(Debug, Clone, Copy)]
pub struct HelperFactory<'a> {
    context: &'a EvaluationContext,
    registry: &'a CurveRegistry,
}

impl<'a> HelperFactory<'a> {
    /// Factory reading from `context` and `registry`.
    #[must_use]
    pub fn new(context: &'a EvaluationContext, registry: &'a CurveRegistry) -> Self {
        Self { context, registry }
    }

    /// Builds every helper of curve `curve_id`.
    pub fn build_all(
        &self,
        curve_id: &str,
        helpers: &[HelperSpec],
    ) -> EngineResult<Vec<CalibrationInstrument>> {
        helpers
            .iter()
            .map(|helper| self.build(curve_id, helper))
            .collect()
    }

    /// Builds one helper of curve `curve_id`.
    pub fn build(&self, curve_id: &str, helper: &HelperSpec) -> EngineResult<CalibrationInstrument> {
        let instrument = match helper {
            HelperSpec::Deposit(spec) => self.deposit(spec)?.into(),
            HelperSpec::Fra(spec) => self.fra(spec)?.into(),
            HelperSpec::Future(spec) => self.future(spec)?.into(),
            HelperSpec::Swap(spec) => self.swap(curve_id, spec)?.into(),
            HelperSpec::Ois(spec) => self.ois(curve_id, spec)?.into(),
            HelperSpec::Bond(spec) => self.bond(spec)?.into(),
        };
        Ok(instrument)
    }

    fn deposit(&self, spec: &DepositSpec) -> EngineResult<Deposit> {
        let rate = self
            .context
            .quotes
            .value_or(spec.quote_id.as_deref(), spec.rate)?;
        let calendar = self.context.calendar_or_default(spec.calendar);
        let convention = self.context.convention_or_default(spec.convention);

        let start = calendar.add_business_days(self.context.evaluation_date, spec.fixing_days as i32);
        let end = calendar.advance(start, spec.tenor, convention, spec.end_of_month)?;
        Ok(Deposit::new(start, end, rate).with_day_count(spec.day_counter))
    }

    fn fra(&self, spec: &FraSpec) -> EngineResult<Fra> {
        if spec.months_to_end <= spec.months_to_start {
            return Err(EngineError::invalid_input(format!(
                "FRA {}x{} ends before it starts",
                spec.months_to_start, spec.months_to_end
            )));
        }
        let rate = self
            .context
            .quotes
            .value_or(spec.quote_id.as_deref(), spec.rate)?;
        let calendar = self.context.calendar_or_default(spec.calendar);
        let convention = self.context.convention_or_default(spec.convention);

        let spot = calendar.add_business_days(self.context.evaluation_date, spec.fixing_days as i32);
        let start = calendar.advance(
            spot,
            Period::months(spec.months_to_start as i32),
            convention,
            spec.end_of_month,
        )?;
        let end = calendar.advance(
            spot,
            Period::months(spec.months_to_end as i32),
            convention,
            spec.end_of_month,
        )?;
        Ok(Fra::new(start, end, rate).with_day_count(spec.day_counter))
    }

    fn future(&self, spec: &FutureSpec) -> EngineResult<RateFuture> {
        let calendar = self.context.calendar_or_default(spec.calendar);
        let convention = self.context.convention_or_default(spec.convention);
        let start = spec.start_date;
        let end = calendar.advance(
            start,
            Period::months(spec.months as i32),
            convention,
            spec.end_of_month,
        )?;

        // a quote id always carries a price
        let price = match spec.quote_id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => Some(self.context.quotes.resolve(id)?),
            None => spec.price,
        };
        let future = match (price, spec.rate) {
            (Some(price), _) => RateFuture::from_price(start, end, price)?,
            (None, Some(rate)) => RateFuture::new(start, end, rate),
            (None, None) => return Err(EngineError::invalid_input("future has no quote")),
        };
        Ok(future
            .with_convexity_adjustment(spec.convexity_adjustment)
            .with_day_count(spec.day_counter))
    }

    fn swap(&self, curve_id: &str, spec: &SwapSpec) -> EngineResult<Swap> {
        let index = self
            .context
            .indices
            .resolve_kind(&spec.float_index, IndexKind::Ibor)?;
        let rate = self
            .context
            .quotes
            .value_or(spec.quote_id.as_deref(), spec.rate)?;
        let calendar_id = spec.calendar.unwrap_or(index.calendar);
        let calendar = calendar_id.calendar();

        let spot = index.value_date(self.context.evaluation_date);
        let start = calendar.adjust(spot.add_days(spec.fwd_start_days), spec.fixed_convention);
        let maturity = spec.tenor.add_to(start)?;

        let fixed = ScheduleBuilder::new(start, maturity)
            .frequency(spec.fixed_frequency)
            .calendar(calendar_id)
            .convention(spec.fixed_convention)
            .rule(DateGeneration::Backward)
            .end_of_month(index.end_of_month)
            .build()?;
        let float = ScheduleBuilder::new(start, maturity)
            .tenor(index.tenor)
            .calendar(index.calendar)
            .convention(index.convention)
            .rule(DateGeneration::Backward)
            .end_of_month(index.end_of_month)
            .build()?;

        let mut swap = Swap::new(
            rate,
            &fixed,
            spec.fixed_day_counter,
            &float,
            index.day_counter,
        )?
        .with_spread(spec.spread);

        let first_fixing = index.fixing_date(swap.float_periods()[0].accrual.start);
        if first_fixing <= self.context.evaluation_date {
            if let Some(fixing) = index.fixing(first_fixing) {
                tracing::debug!(index = %index.id, date = %first_fixing, fixing, "using historical fixing");
                swap = swap.with_fixing(0, fixing);
            }
        }

        if let Some(curve) = self.discount_curve(curve_id, spec.discount_curve.as_deref())? {
            swap = swap.with_discount_curve(curve);
        }
        Ok(swap)
    }

    fn ois(&self, curve_id: &str, spec: &OisSpec) -> EngineResult<OvernightIndexedSwap> {
        let index = self
            .context
            .indices
            .resolve_kind(&spec.overnight_index, IndexKind::Overnight)?;
        let rate = self
            .context
            .quotes
            .value_or(spec.quote_id.as_deref(), spec.rate)?;
        let calendar = index.fixing_calendar();

        let start = match spec.start_date {
            Some(date) => date,
            None => calendar
                .add_business_days(self.context.evaluation_date, spec.settlement_days as i32),
        };
        let end = match (spec.end_date, spec.tenor) {
            (Some(date), _) => date,
            (None, Some(tenor)) => calendar.advance(start, tenor, index.convention, index.end_of_month)?,
            (None, None) => {
                return Err(EngineError::invalid_input(
                    "OIS needs a tenor or an end date",
                ))
            }
        };

        let schedule = ScheduleBuilder::new(start, end)
            .frequency(spec.fixed_frequency)
            .calendar(index.calendar)
            .convention(index.convention)
            .rule(DateGeneration::Backward)
            .end_of_month(index.end_of_month)
            .build()?;

        let mut ois = OvernightIndexedSwap::new(rate, &schedule, index.day_counter)?;
        if let Some(curve) = self.discount_curve(curve_id, spec.discount_curve.as_deref())? {
            ois = ois.with_discount_curve(curve);
        }
        Ok(ois)
    }

    fn bond(&self, spec: &BondSpec) -> EngineResult<FixedRateBond> {
        let price = self
            .context
            .quotes
            .value_or(spec.quote_id.as_deref(), spec.price)?;
        let schedule = self.schedule(&spec.schedule)?;
        let settlement = schedule
            .calendar()
            .calendar()
            .add_business_days(self.context.evaluation_date, spec.settlement_days as i32);

        let mut bond = FixedRateBond::new(
            &schedule,
            spec.coupon_rate,
            spec.day_counter,
            spec.payment_convention,
            spec.face_amount,
            spec.redemption,
        )?
        .with_quote(settlement, price);
        if let Some(issue_date) = spec.issue_date {
            bond = bond.with_issue_date(issue_date);
        }
        Ok(bond)
    }

    fn schedule(&self, spec: &ScheduleSpec) -> EngineResult<Schedule> {
        Ok(ScheduleBuilder::new(spec.effective_date, spec.termination_date)
            .frequency(spec.frequency)
            .calendar(spec.calendar.unwrap_or(self.context.calendar))
            .convention(spec.convention)
            .termination_convention(spec.termination_convention)
            .rule(spec.rule)
            .end_of_month(spec.end_of_month)
            .build()?)
    }

    /// The exogenous discounting curve, if any. Naming the curve being built
    /// means self-discounting.
    fn discount_curve(
        &self,
        curve_id: &str,
        discount_curve: Option<&str>,
    ) -> EngineResult<Option<Arc<PiecewiseCurve>>> {
        match discount_curve {
            None => Ok(None),
            Some(id) if id == curve_id => Ok(None),
            Some(id) => self
                .registry
                .get_by_id(id)
                .map(Some)
                .ok_or_else(|| EngineError::MissingDependency {
                    curve: curve_id.to_string(),
                    missing: id.to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::contracts::BatchRequest;
    use crate::error::ErrorKind;
    use serde_json::json;
    use strata_core::types::Date;
    use strata_curves::{CurveInstrument, CurveSettings};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn context() -> EvaluationContext {
        let request: BatchRequest = serde_json::from_value(json!({
            "as_of_date": "2024-01-05",
            "indices": [
                { "id": "EUR_6M", "tenor": "6M", "calendar": "TARGET",
                  "fixings": [{ "date": "2024-01-05", "value": 0.0391 }] },
                { "id": "ESTR", "kind": "overnight", "tenor": "1D", "fixing_days": 0,
                  "calendar": "TARGET" }
            ],
            "quotes": [
                { "id": "EUR_DEPO_3M", "value": 0.0385 },
                { "id": "ER_H4", "value": 96.1 }
            ],
            "curves": []
        }))
        .unwrap();
        EvaluationContext::from_request(&request, EngineConfig::default()).unwrap()
    }

    fn helper(value: serde_json::Value) -> HelperSpec {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deposit_dates_and_quote() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let instrument = factory
            .build(
                "EUR_6M",
                &helper(json!({ "type": "deposit", "quote_id": "EUR_DEPO_3M", "tenor": "3M" })),
            )
            .unwrap();
        let CalibrationInstrument::Deposit(deposit) = instrument else {
            panic!("expected a deposit");
        };
        // Friday plus two TARGET days
        assert_eq!(deposit.start_date(), d(2024, 1, 9));
        assert_eq!(deposit.end_date(), d(2024, 4, 9));
        assert_eq!(deposit.rate(), 0.0385);
    }

    #[test]
    fn test_fra_and_future() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let fra = factory
            .build(
                "C",
                &helper(json!({ "type": "fra", "rate": 0.037, "months_to_start": 3, "months_to_end": 9 })),
            )
            .unwrap();
        assert_eq!(fra.pillar_date(), d(2024, 10, 9));

        let future = factory
            .build(
                "C",
                &helper(json!({
                    "type": "future", "quote_id": "ER_H4", "start_date": "2024-03-20",
                    "convexity_adjustment": 0.0002
                })),
            )
            .unwrap();
        assert_eq!(future.pillar_date(), d(2024, 6, 20));
        approx::assert_relative_eq!(future.quote(), 0.039 + 0.0002, epsilon = 1e-12);

        let err = factory
            .build(
                "C",
                &helper(json!({ "type": "fra", "rate": 0.03, "months_to_start": 6, "months_to_end": 6 })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_swap_uses_index_conventions_and_fixing() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let instrument = factory
            .build(
                "EUR_6M",
                &helper(json!({ "type": "swap", "rate": 0.034, "tenor": "2Y", "float_index": "EUR_6M" })),
            )
            .unwrap();
        let CalibrationInstrument::Swap(swap) = instrument else {
            panic!("expected a swap");
        };
        assert_eq!(swap.start_date(), d(2024, 1, 9));
        assert_eq!(swap.maturity(), d(2026, 1, 9));
        assert_eq!(swap.fixed_periods().len(), 2);
        assert_eq!(swap.float_periods().len(), 4);
        assert_eq!(swap.float_periods()[0].fixing, Some(0.0391));
        assert_eq!(swap.float_periods()[1].fixing, None);
        assert!(swap.discount_curve().is_none());
    }

    #[test]
    fn test_index_errors() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let err = factory
            .build(
                "C",
                &helper(json!({ "type": "swap", "rate": 0.03, "tenor": "5Y", "float_index": "USD_3M" })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingIndexReference);

        let err = factory
            .build(
                "C",
                &helper(json!({ "type": "swap", "rate": 0.03, "tenor": "5Y", "float_index": "ESTR" })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedHelperCombination);

        let err = factory
            .build(
                "C",
                &helper(json!({ "type": "ois", "rate": 0.03, "tenor": "1Y", "overnight_index": "EUR_6M" })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedHelperCombination);

        let err = factory
            .build(
                "C",
                &helper(json!({ "type": "deposit", "quote_id": "NOPE", "tenor": "3M" })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuoteReference);
    }

    #[test]
    fn test_discount_curve_comes_from_registry() {
        let ctx = context();
        let registry = CurveRegistry::new(&["EUR_OIS", "EUR_6M"]);
        let factory = HelperFactory::new(&ctx, &registry);
        let swap = helper(json!({
            "type": "swap", "rate": 0.034, "tenor": "2Y", "float_index": "EUR_6M",
            "discount_curve": "EUR_OIS"
        }));

        let err = factory.build("EUR_6M", &swap).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);

        let settings = CurveSettings::new(ctx.evaluation_date);
        let ois = PiecewiseCurve::new(settings, &[(d(2030, 1, 7), 0.85)]).unwrap();
        registry.insert(0, Arc::new(ois), "f".into()).unwrap();

        let CalibrationInstrument::Swap(built) = factory.build("EUR_6M", &swap).unwrap() else {
            panic!("expected a swap");
        };
        assert!(built.discount_curve().is_some());

        // naming itself means self-discounting
        let own = helper(json!({
            "type": "ois", "rate": 0.03, "tenor": "1Y", "overnight_index": "ESTR",
            "discount_curve": "EUR_OIS"
        }));
        assert!(factory.build("EUR_OIS", &own).is_ok());
    }

    #[test]
    fn test_dated_ois() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let instrument = factory
            .build(
                "EUR_OIS",
                &helper(json!({
                    "type": "ois", "rate": 0.039, "overnight_index": "ESTR",
                    "start_date": "2024-01-17", "end_date": "2024-03-06"
                })),
            )
            .unwrap();
        let CalibrationInstrument::Ois(ois) = instrument else {
            panic!("expected an OIS");
        };
        assert_eq!(ois.start_date(), d(2024, 1, 17));
        assert_eq!(ois.maturity(), d(2024, 3, 6));
        assert_eq!(ois.periods().len(), 1);

        let err = factory
            .build(
                "EUR_OIS",
                &helper(json!({ "type": "ois", "rate": 0.039, "overnight_index": "ESTR" })),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_bond_settles_on_schedule_calendar() {
        let ctx = context();
        let registry = CurveRegistry::new::<&str>(&[]);
        let factory = HelperFactory::new(&ctx, &registry);

        let instrument = factory
            .build(
                "UST",
                &helper(json!({
                    "type": "bond", "price": 99.5, "coupon_rate": 0.04,
                    "schedule": {
                        "effective_date": "2023-05-15", "termination_date": "2028-05-15",
                        "calendar": "UnitedStatesGovernmentBond"
                    }
                })),
            )
            .unwrap();
        let CalibrationInstrument::Bond(bond) = instrument else {
            panic!("expected a bond");
        };
        assert_eq!(bond.settlement(), d(2024, 1, 10));
        assert_eq!(bond.maturity(), d(2028, 5, 15));
        assert_eq!(bond.quote(), 99.5);
    }
}
