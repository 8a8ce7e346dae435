//! Fixed-rate coupon bond instrument.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::Schedule;
use strata_core::types::Date;

use super::{CurveInstrument, InstrumentType};
use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A dated payment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondCashFlow {
    /// Payment date.
    pub date: Date,
    /// Amount paid, in currency units of the face amount.
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Coupon {
    accrual_start: Date,
    accrual_end: Date,
    ref_start: Date,
    ref_end: Date,
    payment: Date,
    amount: f64,
}

/// A fixed-rate bond quoted by clean price per 100 face.
///
/// Coupons accrue over the schedule's periods with the bond day count,
/// measured against each period's reference period (so ACT/ACT ICMA gets
/// regular and stub periods right), and pay on the accrual end adjusted by
/// the payment convention.
///
/// # Pricing Formula
///
/// ```text
/// clean = Σ CF_i × DF(T_i) / DF(settlement) × 100 / face  -  accrued(settlement)
/// ```
/// over cash flows paid strictly after settlement.
#[derive(Debug, Clone)]
pub struct FixedRateBond {
    coupon_rate: f64,
    face_amount: f64,
    day_count: DayCountConvention,
    coupons: Vec<Coupon>,
    redemption: BondCashFlow,
    maturity: Date,
    issue_date: Option<Date>,
    settlement: Date,
    clean_price: f64,
}

impl FixedRateBond {
    /// Creates a bond from its coupon schedule.
    ///
    /// `redemption` is per 100 face. Until [`FixedRateBond::with_quote`] is
    /// called the bond settles on its first schedule date at par.
    pub fn new(
        schedule: &Schedule,
        coupon_rate: f64,
        day_count: DayCountConvention,
        payment_convention: BusinessDayConvention,
        face_amount: f64,
        redemption: f64,
    ) -> CurveResult<Self> {
        if schedule.num_periods() == 0 {
            return Err(CurveError::invalid_instrument("bond schedule has no periods"));
        }
        if !(face_amount > 0.0) {
            return Err(CurveError::invalid_instrument(format!(
                "face amount {face_amount} must be positive"
            )));
        }
        if !coupon_rate.is_finite() || !redemption.is_finite() {
            return Err(CurveError::invalid_instrument("coupon and redemption must be finite"));
        }

        let calendar = schedule.calendar().calendar();
        let mut coupons = Vec::with_capacity(schedule.num_periods());
        for (i, (start, end)) in schedule.periods().enumerate() {
            let (ref_start, ref_end) = schedule.reference_period(i)?;
            let accrual =
                day_count.year_fraction_with_reference(start, end, ref_start, ref_end);
            coupons.push(Coupon {
                accrual_start: start,
                accrual_end: end,
                ref_start,
                ref_end,
                payment: calendar.adjust(end, payment_convention),
                amount: face_amount * coupon_rate * accrual,
            });
        }

        let maturity = schedule.end_date();
        let redemption = BondCashFlow {
            date: calendar.adjust(maturity, payment_convention),
            amount: face_amount * redemption / 100.0,
        };

        Ok(Self {
            coupon_rate,
            face_amount,
            day_count,
            coupons,
            redemption,
            maturity,
            issue_date: None,
            settlement: schedule.start_date(),
            clean_price: 100.0,
        })
    }

    /// Sets the settlement date and quoted clean price.
    #[must_use]
    pub fn with_quote(mut self, settlement: Date, clean_price: f64) -> Self {
        self.settlement = settlement;
        self.clean_price = clean_price;
        self
    }

    /// Sets the issue date; nothing accrues before it.
    #[must_use]
    pub fn with_issue_date(mut self, issue_date: Date) -> Self {
        self.issue_date = Some(issue_date);
        self
    }

    /// Checks the quote against the bond's dates.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.clean_price.is_finite() && self.clean_price > 0.0) {
            return Err(CurveError::invalid_instrument(format!(
                "clean price {} must be positive",
                self.clean_price
            )));
        }
        if self.settlement >= self.redemption.date {
            return Err(CurveError::invalid_instrument(format!(
                "settlement {} is not before redemption {}",
                self.settlement, self.redemption.date
            )));
        }
        Ok(())
    }

    /// Annual coupon rate.
    #[must_use]
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_rate
    }

    /// Maturity (last schedule date).
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Settlement date of the quote.
    #[must_use]
    pub fn settlement(&self) -> Date {
        self.settlement
    }

    /// Coupons followed by the redemption, in payment order.
    #[must_use]
    pub fn cash_flows(&self) -> Vec<BondCashFlow> {
        self.coupons
            .iter()
            .map(|c| BondCashFlow {
                date: c.payment,
                amount: c.amount,
            })
            .chain(std::iter::once(self.redemption))
            .collect()
    }

    /// Interest accrued at `date`, in currency units.
    #[must_use]
    pub fn accrued_amount(&self, date: Date) -> f64 {
        if self.issue_date.is_some_and(|issue| date < issue) {
            return 0.0;
        }
        self.coupons
            .iter()
            .filter(|c| c.payment > date && c.accrual_start < date)
            .map(|c| {
                let end = date.min(c.accrual_end);
                self.face_amount
                    * self.coupon_rate
                    * self.day_count.year_fraction_with_reference(
                        c.accrual_start,
                        end,
                        c.ref_start,
                        c.ref_end,
                    )
            })
            .sum()
    }

    /// Present value at the curve's reference date of the flows paid
    /// strictly after `date`.
    pub fn npv(&self, curve: &dyn Curve, date: Date) -> CurveResult<f64> {
        self.cash_flows()
            .into_iter()
            .filter(|cf| cf.date > date)
            .try_fold(0.0, |acc, cf| Ok(acc + cf.amount * curve.discount(cf.date)?))
    }

    /// Dirty price per 100 face at the settlement date.
    pub fn dirty_price(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let settlement_df = curve.discount(self.settlement)?;
        let npv = self.npv(curve, self.settlement)?;
        Ok(npv / settlement_df * 100.0 / self.face_amount)
    }

    /// Clean price per 100 face at the settlement date.
    pub fn clean_price(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let accrued = self.accrued_amount(self.settlement) * 100.0 / self.face_amount;
        Ok(self.dirty_price(curve)? - accrued)
    }
}

impl CurveInstrument for FixedRateBond {
    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Bond
    }

    fn pillar_date(&self) -> Date {
        self.maturity
    }

    fn quote(&self) -> f64 {
        self.clean_price
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.clean_price(curve)
    }

    fn description(&self) -> String {
        format!("Bond {:.3}% {}", self.coupon_rate * 100.0, self.maturity)
    }
}
