//! Calibration instruments for curve bootstrapping.
//!
//! Each instrument implements [`CurveInstrument`]: it names the pillar it
//! pins down and prices itself off a curve. The bootstrapper only ever sees
//! the closed [`CalibrationInstrument`] enum.
//!
//! # Available Instruments
//!
//! ## Money Market
//! - [`Deposit`]: simple-rate deposits
//! - [`Fra`]: forward rate agreements
//! - [`RateFuture`]: interest rate futures, with convexity adjustment
//!
//! ## Swaps
//! - [`Swap`]: fixed against an Ibor index, optionally discounted off
//!   another curve
//! - [`OvernightIndexedSwap`]: fixed against a compounded overnight rate
//!
//! ## Bonds
//! - [`FixedRateBond`]: coupon bonds quoted by clean price

mod bond;
mod deposit;
mod fra;
mod future;
mod ois;
mod swap;

pub use bond::{BondCashFlow, FixedRateBond};
pub use deposit::Deposit;
pub use fra::Fra;
pub use future::RateFuture;
pub use ois::OvernightIndexedSwap;
pub use swap::{FloatPeriod, Swap};

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::Schedule;
use strata_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// Instrument type for categorization and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Money market deposit.
    Deposit,
    /// Forward rate agreement.
    Fra,
    /// Interest rate future.
    Future,
    /// Fixed-for-Ibor swap.
    Swap,
    /// Overnight indexed swap.
    Ois,
    /// Fixed-rate bond.
    Bond,
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Deposit => "Deposit",
            Self::Fra => "FRA",
            Self::Future => "Future",
            Self::Swap => "Swap",
            Self::Ois => "OIS",
            Self::Bond => "Bond",
        };
        write!(f, "{name}")
    }
}

/// A simple-interest period `DF(end) = DF(start) / growth`.
///
/// Instruments exposing one can be solved without a root search whenever
/// `DF(start)` is already fixed by earlier pillars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleAccrual {
    /// Start of the period.
    pub start: Date,
    /// End of the period.
    pub end: Date,
    /// `1 + r·τ`.
    pub growth: f64,
}

impl SimpleAccrual {
    /// Discount factor at `end` implied by the one at `start`.
    #[must_use]
    pub fn target_discount(&self, df_start: f64) -> f64 {
        df_start / self.growth
    }
}

/// One accrual period of a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    /// Accrual start.
    pub start: Date,
    /// Accrual end.
    pub end: Date,
    /// Payment date.
    pub payment: Date,
    /// Accrual fraction.
    pub year_fraction: f64,
}

/// Periods of `schedule`, each paid at its end date.
pub(crate) fn accrual_periods(
    schedule: &Schedule,
    day_count: DayCountConvention,
) -> Vec<AccrualPeriod> {
    schedule
        .periods()
        .map(|(start, end)| AccrualPeriod {
            start,
            end,
            payment: end,
            year_fraction: day_count.year_fraction(start, end),
        })
        .collect()
}

/// `Σ τ·DF(payment)` over `periods`.
pub(crate) fn annuity(periods: &[AccrualPeriod], curve: &dyn Curve) -> CurveResult<f64> {
    periods.iter().try_fold(0.0, |acc, p| {
        Ok(acc + p.year_fraction * curve.discount(p.payment)?)
    })
}

/// Simple forward rate over `[start, end]` with accrual fraction `tau`.
pub(crate) fn simple_forward(
    curve: &dyn Curve,
    start: Date,
    end: Date,
    tau: f64,
) -> CurveResult<f64> {
    if tau <= 0.0 {
        return Err(CurveError::invalid_instrument(format!(
            "empty accrual period {start} .. {end}"
        )));
    }
    Ok((curve.discount(start)? / curve.discount(end)? - 1.0) / tau)
}

/// Checks a quoted simple-rate period.
pub(crate) fn validate_period(start: Date, end: Date, rate: f64) -> CurveResult<()> {
    if end <= start {
        return Err(CurveError::invalid_instrument(format!(
            "end date {end} is not after start date {start}"
        )));
    }
    if !rate.is_finite() {
        return Err(CurveError::invalid_instrument(format!("rate {rate} is not finite")));
    }
    Ok(())
}

/// Trait for curve instruments used in bootstrap.
///
/// `residual` is what the bootstrapper drives to zero. Its default is the
/// gap between the model quote and the market quote; instruments with a
/// [`SimpleAccrual`] use the discount-factor gap instead, which is linear in
/// the pillar's discount factor.
pub trait CurveInstrument: Send + Sync + fmt::Debug {
    /// Instrument type.
    fn instrument_type(&self) -> InstrumentType;

    /// The date whose node this instrument determines.
    fn pillar_date(&self) -> Date;

    /// Market quote: a rate, or a clean price for bonds.
    fn quote(&self) -> f64;

    /// Quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Simple-interest structure, for closed-form pillars.
    fn simple_accrual(&self) -> Option<SimpleAccrual> {
        None
    }

    /// Pricing gap under `curve`; zero once the curve is calibrated.
    fn residual(&self, curve: &dyn Curve) -> CurveResult<f64> {
        match self.simple_accrual() {
            Some(accrual) => {
                let start = curve.discount(accrual.start)?;
                Ok(curve.discount(accrual.end)? - accrual.target_discount(start))
            }
            None => Ok(self.implied_quote(curve)? - self.quote()),
        }
    }

    /// Short description for logs and errors.
    fn description(&self) -> String {
        format!("{} {}", self.instrument_type(), self.pillar_date())
    }
}

/// The closed set of calibration instruments.
#[derive(Debug, Clone)]
pub enum CalibrationInstrument {
    /// Deposit.
    Deposit(Deposit),
    /// FRA.
    Fra(Fra),
    /// Future.
    Future(RateFuture),
    /// Swap.
    Swap(Swap),
    /// OIS.
    Ois(OvernightIndexedSwap),
    /// Bond.
    Bond(FixedRateBond),
}

impl CalibrationInstrument {
    fn inner(&self) -> &dyn CurveInstrument {
        match self {
            Self::Deposit(i) => i,
            Self::Fra(i) => i,
            Self::Future(i) => i,
            Self::Swap(i) => i,
            Self::Ois(i) => i,
            Self::Bond(i) => i,
        }
    }
}

impl CurveInstrument for CalibrationInstrument {
    fn instrument_type(&self) -> InstrumentType {
        self.inner().instrument_type()
    }

    fn pillar_date(&self) -> Date {
        self.inner().pillar_date()
    }

    fn quote(&self) -> f64 {
        self.inner().quote()
    }

    fn implied_quote(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.inner().implied_quote(curve)
    }

    fn simple_accrual(&self) -> Option<SimpleAccrual> {
        self.inner().simple_accrual()
    }

    fn residual(&self, curve: &dyn Curve) -> CurveResult<f64> {
        self.inner().residual(curve)
    }

    fn description(&self) -> String {
        self.inner().description()
    }
}

impl From<Deposit> for CalibrationInstrument {
    fn from(i: Deposit) -> Self {
        Self::Deposit(i)
    }
}

impl From<Fra> for CalibrationInstrument {
    fn from(i: Fra) -> Self {
        Self::Fra(i)
    }
}

impl From<RateFuture> for CalibrationInstrument {
    fn from(i: RateFuture) -> Self {
        Self::Future(i)
    }
}

impl From<Swap> for CalibrationInstrument {
    fn from(i: Swap) -> Self {
        Self::Swap(i)
    }
}

impl From<OvernightIndexedSwap> for CalibrationInstrument {
    fn from(i: OvernightIndexedSwap) -> Self {
        Self::Ois(i)
    }
}

impl From<FixedRateBond> for CalibrationInstrument {
    fn from(i: FixedRateBond) -> Self {
        Self::Bond(i)
    }
}
