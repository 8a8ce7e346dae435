//! Request and response contracts.
//!
//! These are plain serde structures; decoding them from a wire format is the
//! caller's business. Dates are ISO strings (`"2024-01-02"`), tenors are
//! period strings (`"6M"`), and enums use their variant names.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::calendars::{BusinessDayConvention, CalendarId};
use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::DateGeneration;
use strata_core::types::{Compounding, Date, Frequency, Period};
use strata_curves::{BootstrapTrait, InterpolationScheme};

use crate::error::ErrorInfo;
use crate::index_registry::IndexDefinition;
use crate::quote_registry::{Quote, QuoteRegistry};

// =============================================================================
// REQUEST
// =============================================================================

/// One batch: market snapshot plus the curves to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Evaluation date; required.
    #[serde(default)]
    pub as_of_date: Option<Date>,
    /// Calendar used where a helper or grid names none.
    #[serde(default)]
    pub calendar: CalendarId,
    /// Convention used where a helper or grid names none.
    #[serde(default = "default_convention")]
    pub convention: BusinessDayConvention,
    /// Index definitions.
    #[serde(default)]
    pub indices: Vec<IndexDefinition>,
    /// Quote table.
    #[serde(default)]
    pub quotes: Vec<Quote>,
    /// Curves with their queries, in result order.
    pub curves: Vec<CurveRequest>,
}

/// A curve and the query to run against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRequest {
    /// Curve definition.
    pub spec: CurveSpec,
    /// Measures to report.
    #[serde(default)]
    pub query: CurveQuery,
}

/// Declarative definition of one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Curve id, unique within the batch.
    pub id: String,
    /// Day counter of the curve's time axis.
    #[serde(default)]
    pub day_counter: DayCountConvention,
    /// Interpolation scheme.
    #[serde(default)]
    pub interpolation: InterpolationScheme,
    /// Node space.
    #[serde(default)]
    pub bootstrap_trait: BootstrapTrait,
    /// Reference date; the evaluation date when absent.
    #[serde(default)]
    pub reference_date: Option<Date>,
    /// Answer queries beyond the last pillar.
    #[serde(default = "default_true")]
    pub extrapolate: bool,
    /// Calibration helpers.
    #[serde(default)]
    pub helpers: Vec<HelperSpec>,
    /// Continuously compounded zero rates, instead of helpers.
    #[serde(default)]
    pub zero_points: Vec<ZeroPoint>,
}

impl CurveSpec {
    /// Ids of other curves this curve discounts off, in declaration order.
    #[must_use]
    pub fn dependencies(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for id in self.helpers.iter().filter_map(HelperSpec::discount_curve) {
            if id != self.id && !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }
}

/// One explicit zero-curve point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroPoint {
    /// Point date.
    pub date: Date,
    /// Continuously compounded zero rate on the curve day counter.
    pub rate: f64,
}

/// A calibrating instrument declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HelperSpec {
    /// Money-market deposit.
    Deposit(DepositSpec),
    /// Forward rate agreement.
    Fra(FraSpec),
    /// Interest rate future.
    Future(FutureSpec),
    /// Fixed against Ibor swap.
    Swap(SwapSpec),
    /// Overnight indexed swap.
    Ois(OisSpec),
    /// Fixed-rate bond.
    Bond(BondSpec),
}

impl HelperSpec {
    /// Variant name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit(_) => "Deposit",
            Self::Fra(_) => "FRA",
            Self::Future(_) => "Future",
            Self::Swap(_) => "Swap",
            Self::Ois(_) => "OIS",
            Self::Bond(_) => "Bond",
        }
    }

    /// Explicit discounting curve, for swaps and OIS.
    #[must_use]
    pub fn discount_curve(&self) -> Option<&str> {
        match self {
            Self::Swap(s) => s.discount_curve.as_deref(),
            Self::Ois(s) => s.discount_curve.as_deref(),
            Self::Deposit(_) | Self::Fra(_) | Self::Future(_) | Self::Bond(_) => None,
        }
    }

    /// Index the helper projects off, if any.
    #[must_use]
    pub fn index(&self) -> Option<&str> {
        match self {
            Self::Swap(s) => Some(&s.float_index),
            Self::Ois(s) => Some(&s.overnight_index),
            Self::Deposit(_) | Self::Fra(_) | Self::Future(_) | Self::Bond(_) => None,
        }
    }

    /// Copy with any resolvable quote id replaced by its value.
    #[must_use]
    pub fn with_resolved_quote(&self, quotes: &QuoteRegistry) -> Self {
        fn resolve(quote_id: &mut Option<String>, inline: &mut Option<f64>, quotes: &QuoteRegistry) {
            if let Some(value) = quote_id.as_deref().and_then(|id| quotes.get(id)) {
                *inline = Some(value);
                *quote_id = None;
            }
        }

        let mut spec = self.clone();
        match &mut spec {
            Self::Deposit(s) => resolve(&mut s.quote_id, &mut s.rate, quotes),
            Self::Fra(s) => resolve(&mut s.quote_id, &mut s.rate, quotes),
            Self::Future(s) => resolve(&mut s.quote_id, &mut s.price, quotes),
            Self::Swap(s) => resolve(&mut s.quote_id, &mut s.rate, quotes),
            Self::Ois(s) => resolve(&mut s.quote_id, &mut s.rate, quotes),
            Self::Bond(s) => resolve(&mut s.quote_id, &mut s.price, quotes),
        }
        spec
    }
}

/// Deposit helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositSpec {
    /// Simple rate.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Quote id for the rate.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Deposit term.
    pub tenor: Period,
    /// Business days from evaluation to start.
    #[serde(default = "default_fixing_days")]
    pub fixing_days: u32,
    /// Calendar.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Business-day convention.
    #[serde(default)]
    pub convention: Option<BusinessDayConvention>,
    /// End-of-month rolling.
    #[serde(default)]
    pub end_of_month: bool,
    /// Accrual day counter.
    #[serde(default = "default_money_market_day_counter")]
    pub day_counter: DayCountConvention,
}

/// FRA helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraSpec {
    /// Simple forward rate.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Quote id for the rate.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Months from spot to start.
    pub months_to_start: u32,
    /// Months from spot to end.
    pub months_to_end: u32,
    /// Business days from evaluation to spot.
    #[serde(default = "default_fixing_days")]
    pub fixing_days: u32,
    /// Calendar.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Business-day convention.
    #[serde(default)]
    pub convention: Option<BusinessDayConvention>,
    /// End-of-month rolling.
    #[serde(default)]
    pub end_of_month: bool,
    /// Accrual day counter.
    #[serde(default = "default_money_market_day_counter")]
    pub day_counter: DayCountConvention,
}

/// Futures helper.
///
/// The quote (inline or by `quote_id`) is a price; `rate` may be given
/// instead when the rate is quoted directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureSpec {
    /// Futures price, `100 × (1 − rate)`.
    #[serde(default)]
    pub price: Option<f64>,
    /// Rate, used when no price is given.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Quote id for the price.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Added to the rate.
    #[serde(default)]
    pub convexity_adjustment: f64,
    /// Start of the underlying period.
    pub start_date: Date,
    /// Length of the underlying period in months.
    #[serde(default = "default_future_months")]
    pub months: u32,
    /// Calendar.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Business-day convention.
    #[serde(default)]
    pub convention: Option<BusinessDayConvention>,
    /// End-of-month rolling.
    #[serde(default)]
    pub end_of_month: bool,
    /// Accrual day counter.
    #[serde(default = "default_money_market_day_counter")]
    pub day_counter: DayCountConvention,
}

/// Vanilla swap helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSpec {
    /// Fixed rate.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Quote id for the rate.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Swap term.
    pub tenor: Period,
    /// Fixed-leg calendar; the index calendar when absent.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Fixed-leg frequency.
    #[serde(default)]
    pub fixed_frequency: Frequency,
    /// Fixed-leg convention.
    #[serde(default = "default_convention")]
    pub fixed_convention: BusinessDayConvention,
    /// Fixed-leg day counter.
    #[serde(default = "default_fixed_day_counter")]
    pub fixed_day_counter: DayCountConvention,
    /// Ibor index id of the floating leg.
    pub float_index: String,
    /// Spread over the index.
    #[serde(default)]
    pub spread: f64,
    /// Calendar days between spot and start.
    #[serde(default)]
    pub fwd_start_days: i64,
    /// Curve to discount off; the curve being built when absent.
    #[serde(default)]
    pub discount_curve: Option<String>,
}

/// OIS helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OisSpec {
    /// Fixed rate.
    #[serde(default)]
    pub rate: Option<f64>,
    /// Quote id for the rate.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Swap term; ignored when `end_date` is given.
    #[serde(default)]
    pub tenor: Option<Period>,
    /// Explicit start date.
    #[serde(default)]
    pub start_date: Option<Date>,
    /// Explicit end date.
    #[serde(default)]
    pub end_date: Option<Date>,
    /// Business days from evaluation to start.
    #[serde(default = "default_fixing_days")]
    pub settlement_days: u32,
    /// Overnight index id.
    pub overnight_index: String,
    /// Fixed-leg frequency.
    #[serde(default)]
    pub fixed_frequency: Frequency,
    /// Curve to discount off; the curve being built when absent.
    #[serde(default)]
    pub discount_curve: Option<String>,
}

/// Coupon schedule of a bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// First accrual date.
    pub effective_date: Date,
    /// Maturity.
    pub termination_date: Date,
    /// Coupon frequency.
    #[serde(default = "default_bond_frequency")]
    pub frequency: Frequency,
    /// Calendar.
    #[serde(default)]
    pub calendar: Option<CalendarId>,
    /// Convention for coupon dates.
    #[serde(default = "default_unadjusted")]
    pub convention: BusinessDayConvention,
    /// Convention for the maturity date.
    #[serde(default = "default_unadjusted")]
    pub termination_convention: BusinessDayConvention,
    /// Generation direction.
    #[serde(default)]
    pub rule: DateGeneration,
    /// End-of-month rolling.
    #[serde(default)]
    pub end_of_month: bool,
}

/// Fixed-rate bond helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondSpec {
    /// Clean price per 100 face.
    #[serde(default)]
    pub price: Option<f64>,
    /// Quote id for the price.
    #[serde(default)]
    pub quote_id: Option<String>,
    /// Business days from evaluation to settlement.
    #[serde(default = "default_bond_settlement_days")]
    pub settlement_days: u32,
    /// Face amount.
    #[serde(default = "default_hundred")]
    pub face_amount: f64,
    /// Coupon schedule.
    pub schedule: ScheduleSpec,
    /// Annual coupon rate.
    pub coupon_rate: f64,
    /// Coupon day counter.
    #[serde(default = "default_bond_day_counter")]
    pub day_counter: DayCountConvention,
    /// Coupon payment convention.
    #[serde(default = "default_unadjusted")]
    pub payment_convention: BusinessDayConvention,
    /// Redemption per 100 face.
    #[serde(default = "default_hundred")]
    pub redemption: f64,
    /// Issue date; nothing accrues before it.
    #[serde(default)]
    pub issue_date: Option<Date>,
}

// =============================================================================
// QUERY
// =============================================================================

/// Measures to evaluate on a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CurveQuery {
    /// Grid dates.
    #[serde(default)]
    pub grid: Grid,
    /// Measures, each reported as one series.
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// Where to evaluate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Grid {
    /// Explicit dates.
    Dates {
        /// The dates, in output order.
        dates: Vec<Date>,
    },
    /// Tenors from the reference date.
    Tenors {
        /// The tenors, in output order.
        tenors: Vec<Period>,
        /// Calendar; the batch default when absent.
        #[serde(default)]
        calendar: Option<CalendarId>,
        /// Convention; the batch default when absent.
        #[serde(default)]
        convention: Option<BusinessDayConvention>,
        /// End-of-month rolling.
        #[serde(default)]
        end_of_month: bool,
    },
    /// Every `step` from `start` through `end`.
    Range {
        /// First date.
        start: Date,
        /// Last date, inclusive.
        end: Date,
        /// Step.
        step: Period,
    },
}

impl Default for Grid {
    fn default() -> Self {
        Self::Dates { dates: Vec::new() }
    }
}

/// A derived measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "measure", rename_all = "snake_case")]
pub enum Measure {
    /// Discount factor.
    Discount,
    /// Zero rate from the reference date.
    Zero {
        /// Day counter; the curve's when absent.
        #[serde(default)]
        day_counter: Option<DayCountConvention>,
        /// Compounding.
        #[serde(default)]
        compounding: Compounding,
        /// Compounding frequency.
        #[serde(default)]
        frequency: Frequency,
    },
    /// Forward rate starting at the grid date.
    Forward {
        /// Forward period.
        #[serde(default)]
        period: ForwardPeriod,
        /// Day counter; the curve's when absent.
        #[serde(default)]
        day_counter: Option<DayCountConvention>,
        /// Compounding.
        #[serde(default = "default_forward_compounding")]
        compounding: Compounding,
        /// Compounding frequency.
        #[serde(default)]
        frequency: Frequency,
    },
}

/// Length of a forward rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ForwardPeriod {
    /// Instantaneous forward.
    Instantaneous,
    /// Simple forward over a tenor.
    Tenor(Period),
}

impl Default for ForwardPeriod {
    fn default() -> Self {
        Self::Tenor(Period::months(3))
    }
}

impl TryFrom<String> for ForwardPeriod {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.eq_ignore_ascii_case("instantaneous") {
            return Ok(Self::Instantaneous);
        }
        s.parse::<Period>()
            .map(Self::Tenor)
            .map_err(|e| e.to_string())
    }
}

impl From<ForwardPeriod> for String {
    fn from(p: ForwardPeriod) -> Self {
        p.to_string()
    }
}

impl fmt::Display for ForwardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instantaneous => f.write_str("instantaneous"),
            Self::Tenor(p) => write!(f, "{p}"),
        }
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// One result per requested curve, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    /// Per-curve results.
    pub results: Vec<CurveOutput>,
}

impl BatchResponse {
    /// Result of curve `id`.
    #[must_use]
    pub fn result(&self, id: &str) -> Option<&CurveOutput> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Result for one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveOutput {
    /// Curve id.
    pub id: String,
    /// Reference date of the built curve.
    pub reference_date: Option<Date>,
    /// Resolved grid, in request order.
    pub grid_dates: Vec<Date>,
    /// Pillar dates of the built curve.
    pub pillar_dates: Vec<Date>,
    /// One series per requested measure.
    pub series: Vec<Series>,
    /// Isolated grid point failures.
    pub point_errors: Vec<PointError>,
    /// Curve-level failure.
    pub error: Option<ErrorInfo>,
}

impl CurveOutput {
    /// True when the curve has no curve-level error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Values of one measure along the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// The measure.
    pub measure: Measure,
    /// One value per grid date; `None` where the point failed.
    pub values: Vec<Option<f64>>,
}

/// A failed grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointError {
    /// Grid index.
    pub index: usize,
    /// Grid date.
    pub date: Date,
    /// Failure.
    pub error: ErrorInfo,
}

fn default_true() -> bool {
    true
}

fn default_convention() -> BusinessDayConvention {
    BusinessDayConvention::ModifiedFollowing
}

fn default_unadjusted() -> BusinessDayConvention {
    BusinessDayConvention::Unadjusted
}

fn default_fixing_days() -> u32 {
    2
}

fn default_bond_settlement_days() -> u32 {
    3
}

fn default_future_months() -> u32 {
    3
}

fn default_money_market_day_counter() -> DayCountConvention {
    DayCountConvention::Act360
}

fn default_fixed_day_counter() -> DayCountConvention {
    DayCountConvention::Thirty360European
}

fn default_bond_day_counter() -> DayCountConvention {
    DayCountConvention::ActActIcma
}

fn default_bond_frequency() -> Frequency {
    Frequency::Semiannual
}

fn default_hundred() -> f64 {
    100.0
}

fn default_forward_compounding() -> Compounding {
    Compounding::Simple
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_helper_tagging() {
        let helper: HelperSpec = serde_json::from_value(json!({
            "type": "swap",
            "quote_id": "EUR_SWAP_5Y",
            "tenor": "5Y",
            "float_index": "EUR_6M",
            "discount_curve": "EUR_OIS"
        }))
        .unwrap();

        assert_eq!(helper.name(), "Swap");
        assert_eq!(helper.discount_curve(), Some("EUR_OIS"));
        assert_eq!(helper.index(), Some("EUR_6M"));
        let HelperSpec::Swap(swap) = helper else {
            panic!("expected a swap");
        };
        assert_eq!(swap.fixed_frequency, Frequency::Annual);
        assert_eq!(swap.fixed_day_counter, DayCountConvention::Thirty360European);
    }

    #[test]
    fn test_curve_spec_defaults_and_dependencies() {
        let spec: CurveSpec = serde_json::from_value(json!({
            "id": "EUR_6M",
            "helpers": [
                { "type": "deposit", "rate": 0.039, "tenor": "6M" },
                { "type": "swap", "rate": 0.035, "tenor": "2Y", "float_index": "EUR_6M",
                  "discount_curve": "EUR_OIS" },
                { "type": "swap", "rate": 0.034, "tenor": "5Y", "float_index": "EUR_6M",
                  "discount_curve": "EUR_OIS" },
                { "type": "ois", "rate": 0.03, "tenor": "1Y", "overnight_index": "ESTR",
                  "discount_curve": "EUR_6M" }
            ]
        }))
        .unwrap();

        assert!(spec.extrapolate);
        assert_eq!(spec.bootstrap_trait, BootstrapTrait::Discount);
        assert_eq!(spec.interpolation, InterpolationScheme::LogLinear);
        assert_eq!(spec.dependencies(), vec!["EUR_OIS"]);
    }

    #[test]
    fn test_measure_and_grid_shapes() {
        let query: CurveQuery = serde_json::from_value(json!({
            "grid": { "type": "tenors", "tenors": ["0D", "1Y", "10Y"] },
            "measures": [
                { "measure": "discount" },
                { "measure": "zero", "compounding": "Compounded" },
                { "measure": "forward", "period": "6M" },
                { "measure": "forward", "period": "instantaneous" }
            ]
        }))
        .unwrap();

        assert!(matches!(query.grid, Grid::Tenors { ref tenors, .. } if tenors.len() == 3));
        assert_eq!(
            query.measures[2],
            Measure::Forward {
                period: ForwardPeriod::Tenor(Period::months(6)),
                day_counter: None,
                compounding: Compounding::Simple,
                frequency: Frequency::Annual,
            }
        );
        assert!(matches!(
            query.measures[3],
            Measure::Forward { period: ForwardPeriod::Instantaneous, .. }
        ));

        let text = serde_json::to_string(&query.measures[2]).unwrap();
        assert!(text.contains("\"period\":\"6M\""));
    }

    #[test]
    fn test_resolved_quote_replaces_id() {
        let quotes = QuoteRegistry::from_quotes(&[Quote {
            id: "ED_H4".into(),
            value: 95.1,
        }])
        .unwrap();
        let helper: HelperSpec = serde_json::from_value(json!({
            "type": "future", "quote_id": "ED_H4", "start_date": "2024-03-20"
        }))
        .unwrap();

        let HelperSpec::Future(resolved) = helper.with_resolved_quote(&quotes) else {
            panic!("expected a future");
        };
        assert_eq!(resolved.price, Some(95.1));
        assert_eq!(resolved.quote_id, None);
    }
}
