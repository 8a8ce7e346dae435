//! Piecewise curve defined by nodes at pillar dates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;
use strata_math::interpolation::Interpolator;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationScheme;
use crate::traits::Curve;
use crate::value_type::BootstrapTrait;

/// Times closer than this to the last pillar count as the pillar itself.
const TIME_EPSILON: f64 = 1e-12;

/// Curve-level settings shared by a bootstrap and the curve it produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSettings {
    /// Reference date; node 0 sits here.
    pub reference_date: Date,
    /// Day counter of the time axis.
    pub day_counter: DayCountConvention,
    /// Node space.
    pub bootstrap_trait: BootstrapTrait,
    /// Interpolation between nodes.
    pub interpolation: InterpolationScheme,
    /// Whether queries beyond the last pillar are answered.
    pub extrapolate: bool,
}

impl CurveSettings {
    /// Settings with a LogLinear discount curve on ACT/365F that extrapolates.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            day_counter: DayCountConvention::Act365Fixed,
            bootstrap_trait: BootstrapTrait::Discount,
            interpolation: InterpolationScheme::LogLinear,
            extrapolate: true,
        }
    }

    /// Sets the day counter.
    #[must_use]
    pub fn with_day_counter(mut self, day_counter: DayCountConvention) -> Self {
        self.day_counter = day_counter;
        self
    }

    /// Sets the bootstrap trait.
    #[must_use]
    pub fn with_trait(mut self, bootstrap_trait: BootstrapTrait) -> Self {
        self.bootstrap_trait = bootstrap_trait;
        self
    }

    /// Sets the interpolation scheme.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationScheme) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Enables or disables extrapolation.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolate: bool) -> Self {
        self.extrapolate = extrapolate;
        self
    }

    /// Fails when the trait and scheme cannot be bootstrapped together.
    pub fn validate(&self) -> CurveResult<()> {
        match self.bootstrap_trait.unsupported_reason(self.interpolation) {
            None => Ok(()),
            Some(reason) => Err(CurveError::unsupported_combination(
                self.bootstrap_trait,
                self.interpolation,
                reason,
            )),
        }
    }

    /// Curve time of `date`.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.day_counter.year_fraction(self.reference_date, date)
    }
}

/// A solved, queryable curve.
///
/// Node 0 is the reference date. Between nodes the trait's quantity is
/// interpolated with the curve's scheme; beyond the last pillar the
/// instantaneous forward is held flat when extrapolation is enabled.
///
/// # Example
///
/// ```rust
/// use strata_core::types::Date;
/// use strata_curves::prelude::*;
///
/// let reference = Date::from_ymd(2024, 1, 2).unwrap();
/// let settings = CurveSettings::new(reference);
/// let curve = PiecewiseCurve::new(
///     settings,
///     &[
///         (Date::from_ymd(2025, 1, 2).unwrap(), 0.96),
///         (Date::from_ymd(2026, 1, 2).unwrap(), 0.92),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(curve.discount(reference).unwrap(), 1.0);
/// let df = curve.discount(Date::from_ymd(2025, 7, 2).unwrap()).unwrap();
/// assert!(df < 0.96 && df > 0.92);
/// ```
pub struct PiecewiseCurve {
    settings: CurveSettings,
    dates: Vec<Date>,
    times: Vec<f64>,
    values: Vec<f64>,
    discounts: Vec<f64>,
    interpolator: Box<dyn Interpolator>,
    tail_forward: f64,
}

impl PiecewiseCurve {
    /// Builds a curve from pillar nodes expressed in the trait's space.
    ///
    /// Pillars must be strictly increasing and after the reference date.
    /// Node 0 is 1 for discount curves and a copy of the first pillar
    /// otherwise.
    pub fn new(settings: CurveSettings, pillars: &[(Date, f64)]) -> CurveResult<Self> {
        settings.validate()?;
        if pillars.is_empty() {
            return Err(CurveError::InsufficientPillars {
                required: 1,
                got: 0,
            });
        }

        let mut dates = Vec::with_capacity(pillars.len() + 1);
        let mut values = Vec::with_capacity(pillars.len() + 1);
        dates.push(settings.reference_date);
        values.push(match settings.bootstrap_trait {
            BootstrapTrait::Discount => 1.0,
            BootstrapTrait::ZeroRate | BootstrapTrait::ForwardRate => pillars[0].1,
        });
        for &(date, value) in pillars {
            let last = dates[dates.len() - 1];
            if date <= last {
                return Err(CurveError::invalid_value(format!(
                    "pillar {date} is not after {last}"
                )));
            }
            dates.push(date);
            values.push(value);
        }

        let times = dates.iter().map(|d| settings.time(*d)).collect();
        Self::from_nodes(settings, dates, times, values)
    }

    /// Builds a zero-rate curve from continuously compounded `(date, rate)`
    /// points.
    ///
    /// A point on the reference date sets node 0; otherwise node 0 copies
    /// the first point.
    pub fn from_zero_points(
        settings: CurveSettings,
        points: &[(Date, f64)],
    ) -> CurveResult<Self> {
        let settings = settings.with_trait(BootstrapTrait::ZeroRate);
        let mut sorted = points.to_vec();
        sorted.sort_by_key(|(date, _)| *date);

        let reference = settings.reference_date;
        if let Some(&(date, _)) = sorted.iter().find(|(date, _)| *date < reference) {
            return Err(CurveError::before_reference(date, reference));
        }
        let anchor = sorted
            .first()
            .filter(|(date, _)| *date == reference)
            .map(|(_, rate)| *rate);
        let pillars: Vec<(Date, f64)> =
            sorted.into_iter().filter(|(date, _)| *date > reference).collect();

        let mut curve = Self::new(settings, &pillars)?;
        if let Some(rate) = anchor {
            let mut values = curve.values.clone();
            values[0] = rate;
            curve = Self::from_nodes(settings, curve.dates, curve.times, values)?;
        }
        Ok(curve)
    }

    /// Builds a curve from complete node vectors, node 0 included.
    pub(crate) fn from_nodes(
        settings: CurveSettings,
        dates: Vec<Date>,
        times: Vec<f64>,
        values: Vec<f64>,
    ) -> CurveResult<Self> {
        if settings.interpolation.requires_positive() {
            if let Some(i) = values.iter().position(|v| *v <= 0.0) {
                return Err(CurveError::invalid_value(format!(
                    "{} interpolation of {} needs positive nodes, node {i} is {}",
                    settings.interpolation, settings.bootstrap_trait, values[i]
                )));
            }
        }
        let interpolator = settings
            .interpolation
            .build(times.clone(), values.clone())?;

        let mut curve = Self {
            settings,
            dates,
            times,
            values,
            discounts: Vec::new(),
            interpolator,
            tail_forward: 0.0,
        };
        curve.discounts = curve
            .times
            .iter()
            .map(|t| curve.interpolated_discount(*t))
            .collect::<CurveResult<_>>()?;
        curve.tail_forward = curve.interpolated_forward(curve.last_time())?;
        Ok(curve)
    }

    /// Curve settings.
    #[must_use]
    pub fn settings(&self) -> &CurveSettings {
        &self.settings
    }

    /// Bootstrap trait of the nodes.
    #[must_use]
    pub fn bootstrap_trait(&self) -> BootstrapTrait {
        self.settings.bootstrap_trait
    }

    /// Interpolation scheme.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationScheme {
        self.settings.interpolation
    }

    /// True if queries beyond the last pillar are answered.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        self.settings.extrapolate
    }

    /// Pillar dates, reference date excluded.
    #[must_use]
    pub fn pillar_dates(&self) -> &[Date] {
        &self.dates[1..]
    }

    /// Node dates, reference date first.
    #[must_use]
    pub fn node_dates(&self) -> &[Date] {
        &self.dates
    }

    /// Node times, zero first.
    #[must_use]
    pub fn node_times(&self) -> &[f64] {
        &self.times
    }

    /// Node values in the trait's space.
    #[must_use]
    pub fn node_values(&self) -> &[f64] {
        &self.values
    }

    /// Discount factors at the nodes.
    #[must_use]
    pub fn node_discounts(&self) -> &[f64] {
        &self.discounts
    }

    /// The last pillar date.
    #[must_use]
    pub fn max_date(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    /// Copy of this curve with extrapolation switched on or off.
    pub fn with_extrapolation(&self, extrapolate: bool) -> CurveResult<Self> {
        Self::from_nodes(
            self.settings.with_extrapolation(extrapolate),
            self.dates.clone(),
            self.times.clone(),
            self.values.clone(),
        )
    }

    fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    fn interpolated_discount(&self, t: f64) -> CurveResult<f64> {
        let df = match self.settings.bootstrap_trait {
            BootstrapTrait::Discount => self.interpolator.interpolate(t)?,
            BootstrapTrait::ZeroRate => (-self.interpolator.interpolate(t)? * t).exp(),
            BootstrapTrait::ForwardRate => (-self.interpolator.primitive(t)?).exp(),
        };
        Ok(df)
    }

    fn interpolated_forward(&self, t: f64) -> CurveResult<f64> {
        let f = match self.settings.bootstrap_trait {
            BootstrapTrait::Discount => {
                -self.interpolator.derivative(t)? / self.interpolator.interpolate(t)?
            }
            BootstrapTrait::ZeroRate => {
                self.interpolator.interpolate(t)? + t * self.interpolator.derivative(t)?
            }
            BootstrapTrait::ForwardRate => self.interpolator.interpolate(t)?,
        };
        Ok(f)
    }

    /// Classifies `t`: `Ok(None)` inside the nodes, `Ok(Some(dt))` beyond the
    /// last pillar by `dt` when extrapolating.
    fn locate(&self, t: f64) -> CurveResult<Option<f64>> {
        if !t.is_finite() || t < 0.0 {
            return Err(CurveError::invalid_value(format!("curve time {t}")));
        }
        let last = self.last_time();
        if t <= last + TIME_EPSILON {
            return Ok(None);
        }
        if self.settings.extrapolate {
            Ok(Some(t - last))
        } else {
            Err(CurveError::beyond_last_pillar(t, last))
        }
    }
}

impl Curve for PiecewiseCurve {
    fn reference_date(&self) -> Date {
        self.settings.reference_date
    }

    fn day_counter(&self) -> DayCountConvention {
        self.settings.day_counter
    }

    fn discount_t(&self, t: f64) -> CurveResult<f64> {
        if t == 0.0 {
            return Ok(1.0);
        }
        match self.locate(t)? {
            None => self.interpolated_discount(t.min(self.last_time())),
            Some(dt) => {
                let last = self.discounts[self.discounts.len() - 1];
                Ok(last * (-self.tail_forward * dt).exp())
            }
        }
    }

    fn instantaneous_forward_t(&self, t: f64) -> CurveResult<f64> {
        match self.locate(t)? {
            None => self.interpolated_forward(t.min(self.last_time())),
            Some(_) => Ok(self.tail_forward),
        }
    }
}

impl fmt::Debug for PiecewiseCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseCurve")
            .field("reference_date", &self.settings.reference_date)
            .field("trait", &self.settings.bootstrap_trait)
            .field("interpolation", &self.settings.interpolation)
            .field("pillars", &self.pillar_dates().len())
            .field("max_date", &self.max_date())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strata_core::types::{Compounding, Frequency};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn settings() -> CurveSettings {
        CurveSettings::new(d(2024, 1, 2))
    }

    #[test]
    fn test_reference_discount_is_one_for_every_scheme() {
        let pillars = [(d(2025, 1, 2), 0.96), (d(2027, 1, 2), 0.88)];
        for scheme in InterpolationScheme::all() {
            let curve =
                PiecewiseCurve::new(settings().with_interpolation(*scheme), &pillars).unwrap();
            assert_relative_eq!(curve.discount(d(2024, 1, 2)).unwrap(), 1.0, epsilon = 1e-10);
            assert_relative_eq!(curve.discount(d(2027, 1, 2)).unwrap(), 0.88, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_flat_forward_extrapolation() {
        let curve =
            PiecewiseCurve::new(settings(), &[(d(2025, 1, 2), 0.96), (d(2026, 1, 2), 0.92)])
                .unwrap();
        let t1 = curve.time(d(2025, 1, 2));
        let t2 = curve.time(d(2026, 1, 2));
        let f = (0.96_f64 / 0.92).ln() / (t2 - t1);

        let far = d(2030, 1, 2);
        let expected = 0.92 * (-f * (curve.time(far) - t2)).exp();
        assert_relative_eq!(curve.discount(far).unwrap(), expected, epsilon = 1e-14);
        assert_relative_eq!(curve.instantaneous_forward(far).unwrap(), f, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_disabled() {
        let curve = PiecewiseCurve::new(
            settings().with_extrapolation(false),
            &[(d(2025, 1, 2), 0.96)],
        )
        .unwrap();
        let err = curve.discount(d(2025, 1, 3)).unwrap_err();
        assert!(err.is_out_of_range());
        assert!(curve.discount(d(2025, 1, 2)).is_ok());
        assert!(curve.with_extrapolation(true).unwrap().discount(d(2025, 1, 3)).is_ok());
    }

    #[test]
    fn test_before_reference_is_rejected() {
        let curve = PiecewiseCurve::new(settings(), &[(d(2025, 1, 2), 0.96)]).unwrap();
        assert!(matches!(
            curve.discount(d(2023, 12, 29)),
            Err(CurveError::BeforeReference { .. })
        ));
    }

    #[test]
    fn test_zero_trait_mirrors_first_node() {
        let curve = PiecewiseCurve::new(
            settings()
                .with_trait(BootstrapTrait::ZeroRate)
                .with_interpolation(InterpolationScheme::Linear),
            &[(d(2025, 1, 2), 0.03), (d(2026, 1, 2), 0.04)],
        )
        .unwrap();
        assert_eq!(curve.node_values()[0], 0.03);
        let mid = d(2024, 7, 2);
        let z = curve
            .zero_rate(mid, DayCountConvention::Act365Fixed, Compounding::Continuous, Frequency::Annual)
            .unwrap();
        assert_relative_eq!(z.rate(), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_forward_trait_integrates_forwards() {
        let curve = PiecewiseCurve::new(
            settings()
                .with_trait(BootstrapTrait::ForwardRate)
                .with_interpolation(InterpolationScheme::BackwardFlat),
            &[(d(2025, 1, 2), 0.02), (d(2026, 1, 2), 0.05)],
        )
        .unwrap();
        let t1 = curve.time(d(2025, 1, 2));
        let t2 = curve.time(d(2026, 1, 2));
        let expected = (-0.02 * t1 - 0.05 * (t2 - t1)).exp();
        assert_relative_eq!(curve.discount(d(2026, 1, 2)).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_points() {
        let reference = d(2024, 1, 2);
        let curve = PiecewiseCurve::from_zero_points(
            settings().with_interpolation(InterpolationScheme::Linear),
            &[(d(2029, 1, 2), 0.035), (reference, 0.02), (d(2025, 1, 2), 0.025)],
        )
        .unwrap();
        assert_eq!(curve.bootstrap_trait(), BootstrapTrait::ZeroRate);
        assert_eq!(curve.pillar_dates().len(), 2);
        assert_eq!(curve.node_values()[0], 0.02);

        let t = curve.time(d(2029, 1, 2));
        assert_relative_eq!(
            curve.discount(d(2029, 1, 2)).unwrap(),
            (-0.035 * t).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_forward_flat_forward_curve_rejected() {
        let result = PiecewiseCurve::new(
            settings()
                .with_trait(BootstrapTrait::ForwardRate)
                .with_interpolation(InterpolationScheme::ForwardFlat),
            &[(d(2025, 1, 2), 0.02)],
        );
        assert!(matches!(result, Err(CurveError::UnsupportedCombination { .. })));
    }

    #[test]
    fn test_unordered_pillars_rejected() {
        let result =
            PiecewiseCurve::new(settings(), &[(d(2026, 1, 2), 0.92), (d(2025, 1, 2), 0.96)]);
        assert!(result.is_err());
    }
}
