//! Pillar-by-pillar bootstrap.

use std::sync::Arc;

use strata_core::types::Date;
use strata_math::solvers::{solve_with_expansion, BrentSolver, RootSolver};

use super::state::transition;
use super::{BootstrapConfig, CurveState, NodeMethod};
use crate::curves::{CurveSettings, PiecewiseCurve};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{CalibrationInstrument, CurveInstrument};
use crate::traits::Curve;
use crate::value_type::BootstrapTrait;

/// Times within this of a known node count as known.
const KNOWN_EPSILON: f64 = 1e-12;

/// Smallest discount factor the solver may try.
const DISCOUNT_FLOOR: f64 = 1e-14;

/// Smallest node value tried under log interpolation of rates.
const LOG_RATE_FLOOR: f64 = 1e-10;

/// Rate used to seed the first pillar.
const SEED_RATE: f64 = 0.03;

/// Sequential bootstrapper.
///
/// Solves each pillar's node so that its instrument reprices, with the
/// nodes of earlier pillars frozen.
///
/// # Example
///
/// ```rust
/// use strata_core::types::Date;
/// use strata_curves::prelude::*;
///
/// let reference = Date::from_ymd(2024, 1, 2).unwrap();
/// let deposits: Vec<CalibrationInstrument> = vec![
///     Deposit::new(reference, Date::from_ymd(2024, 7, 2).unwrap(), 0.040).into(),
///     Deposit::new(reference, Date::from_ymd(2025, 1, 2).unwrap(), 0.042).into(),
/// ];
///
/// let curve = Bootstrapper::default()
///     .bootstrap("USD_DEPO", CurveSettings::new(reference), deposits)
///     .unwrap();
///
/// assert_eq!(curve.pillar_dates().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    solver: Arc<dyn RootSolver>,
    config: BootstrapConfig,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new(Arc::new(BrentSolver))
    }
}

/// Node vectors of a curve under construction.
struct Nodes {
    dates: Vec<Date>,
    times: Vec<f64>,
    values: Vec<f64>,
}

impl Bootstrapper {
    /// Creates a bootstrapper around `solver` with default settings.
    #[must_use]
    pub fn new(solver: Arc<dyn RootSolver>) -> Self {
        Self {
            solver,
            config: BootstrapConfig::default(),
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Name of the injected root solver.
    #[must_use]
    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Builds curve `id` from `instruments`.
    ///
    /// Instruments are ordered by pillar date (stable). Pillars at or
    /// before the reference date are skipped, as are later instruments
    /// sharing a pillar date with an earlier one.
    pub fn bootstrap(
        &self,
        id: &str,
        settings: CurveSettings,
        instruments: Vec<CalibrationInstrument>,
    ) -> CurveResult<PiecewiseCurve> {
        let span = tracing::info_span!("curve", id);
        let _guard = span.enter();

        let mut state = CurveState::Pending;
        let prepared = settings
            .validate()
            .and_then(|()| Self::prepare(id, &settings, instruments));
        let instruments = match prepared {
            Ok(instruments) => instruments,
            Err(e) => {
                transition(id, &mut state, CurveState::Failed);
                tracing::warn!(curve = id, error = %e, "curve rejected");
                return Err(e);
            }
        };

        transition(id, &mut state, CurveState::InProgress);
        tracing::info!(
            curve = id,
            pillars = instruments.len(),
            bootstrap_trait = %settings.bootstrap_trait,
            interpolation = %settings.interpolation,
            solver = self.solver.name(),
            "bootstrapping"
        );

        match self.solve(id, &settings, &instruments) {
            Ok(curve) => {
                transition(id, &mut state, CurveState::Built);
                tracing::info!(curve = id, max_date = %curve.max_date(), "curve built");
                Ok(curve)
            }
            Err(e) => {
                transition(id, &mut state, CurveState::Failed);
                tracing::warn!(curve = id, error = %e, "bootstrap failed");
                Err(e)
            }
        }
    }

    /// Sorts, de-duplicates and filters the instruments.
    fn prepare(
        id: &str,
        settings: &CurveSettings,
        mut instruments: Vec<CalibrationInstrument>,
    ) -> CurveResult<Vec<CalibrationInstrument>> {
        instruments.sort_by_key(|i| i.pillar_date());

        let reference = settings.reference_date;
        let mut kept: Vec<CalibrationInstrument> = Vec::with_capacity(instruments.len());
        for instrument in instruments {
            let pillar = instrument.pillar_date();
            if pillar <= reference {
                tracing::debug!(
                    curve = id,
                    instrument = %instrument.description(),
                    %pillar,
                    "pillar not after reference date, skipped"
                );
                continue;
            }
            if kept.last().is_some_and(|k| k.pillar_date() == pillar) {
                tracing::debug!(
                    curve = id,
                    instrument = %instrument.description(),
                    %pillar,
                    "duplicate pillar date, skipped"
                );
                continue;
            }
            kept.push(instrument);
        }

        if kept.is_empty() {
            return Err(CurveError::InsufficientPillars {
                required: 1,
                got: 0,
            });
        }
        Ok(kept)
    }

    fn solve(
        &self,
        id: &str,
        settings: &CurveSettings,
        instruments: &[CalibrationInstrument],
    ) -> CurveResult<PiecewiseCurve> {
        let mut nodes = Self::initial_nodes(settings, instruments)?;
        let n = instruments.len();
        let trial_settings = settings.with_extrapolation(true);

        for (i, instrument) in (1..=n).zip(instruments) {
            let method = match Self::closed_form(&trial_settings, &nodes, i, instrument)? {
                Some(value) => {
                    nodes.set(settings.bootstrap_trait, i, value);
                    NodeMethod::ClosedForm
                }
                None => {
                    let value =
                        self.root_find(&trial_settings, &nodes, i, i + 1, instrument, None)?;
                    nodes.set(settings.bootstrap_trait, i, value);
                    NodeMethod::RootFind
                }
            };
            tracing::debug!(
                curve = id,
                pillar = %nodes.dates[i],
                value = nodes.values[i],
                ?method,
                "pillar solved"
            );
        }

        if !settings.interpolation.is_local() && n > 1 {
            self.refine(id, &trial_settings, &mut nodes, instruments)?;
        }

        PiecewiseCurve::from_nodes(*settings, nodes.dates, nodes.times, nodes.values)
    }

    /// Repeats full passes until no node moves by more than the tolerance.
    fn refine(
        &self,
        id: &str,
        settings: &CurveSettings,
        nodes: &mut Nodes,
        instruments: &[CalibrationInstrument],
    ) -> CurveResult<()> {
        let n = instruments.len();
        let tolerance = self.config.pass_tolerance();
        let passes = self.config.max_passes.max(2);
        let mut max_change = f64::INFINITY;

        for pass in 2..=passes {
            max_change = 0.0_f64;
            for (i, instrument) in (1..=n).zip(instruments) {
                let previous = nodes.values[i];
                let value =
                    self.root_find(settings, nodes, i, n + 1, instrument, Some(previous))?;
                max_change = max_change.max((value - previous).abs());
                nodes.set(settings.bootstrap_trait, i, value);
            }
            tracing::debug!(curve = id, pass, max_change, "bootstrap pass");
            if max_change < tolerance {
                return Ok(());
            }
        }

        Err(CurveError::PassesExhausted { passes, max_change })
    }

    fn initial_nodes(
        settings: &CurveSettings,
        instruments: &[CalibrationInstrument],
    ) -> CurveResult<Nodes> {
        let mut dates = Vec::with_capacity(instruments.len() + 1);
        dates.push(settings.reference_date);
        dates.extend(instruments.iter().map(|i| i.pillar_date()));

        let times: Vec<f64> = dates.iter().map(|d| settings.time(*d)).collect();
        if let Some(w) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CurveError::invalid_value(format!(
                "pillar {} has no positive time after {} under {}",
                dates[w + 1],
                dates[w],
                settings.day_counter
            )));
        }

        let seed = match settings.bootstrap_trait {
            BootstrapTrait::Discount => 1.0,
            BootstrapTrait::ZeroRate | BootstrapTrait::ForwardRate => SEED_RATE,
        };
        let values = vec![seed; dates.len()];
        Ok(Nodes {
            dates,
            times,
            values,
        })
    }

    /// Node for pillar `i` straight from a simple-accrual target, when the
    /// start discount factor is already fixed and the scheme allows it.
    fn closed_form(
        settings: &CurveSettings,
        nodes: &Nodes,
        i: usize,
        instrument: &CalibrationInstrument,
    ) -> CurveResult<Option<f64>> {
        let bootstrap_trait = settings.bootstrap_trait;
        if !settings.interpolation.is_local() || bootstrap_trait == BootstrapTrait::ForwardRate {
            return Ok(None);
        }
        let Some(accrual) = instrument.simple_accrual() else {
            return Ok(None);
        };

        let known_until = if bootstrap_trait == BootstrapTrait::Discount || i > 1 {
            nodes.times[i - 1]
        } else {
            0.0
        };
        let t_start = settings.time(accrual.start);
        if t_start < 0.0 || t_start > known_until + KNOWN_EPSILON {
            return Ok(None);
        }

        let df_start = if t_start <= 0.0 {
            1.0
        } else {
            let prefix = PiecewiseCurve::from_nodes(
                *settings,
                nodes.dates[..i].to_vec(),
                nodes.times[..i].to_vec(),
                nodes.values[..i].to_vec(),
            )?;
            prefix.discount_t(t_start)?
        };

        let target = accrual.target_discount(df_start);
        if !(target.is_finite() && target > 0.0) {
            return Err(CurveError::non_convergence(
                nodes.dates[i],
                instrument.description(),
                format!("target discount factor {target}"),
            ));
        }
        Ok(bootstrap_trait.node_from_discount(target, nodes.times[i]))
    }

    /// Solves node `i` on the first `len` nodes.
    fn root_find(
        &self,
        settings: &CurveSettings,
        nodes: &Nodes,
        i: usize,
        len: usize,
        instrument: &CalibrationInstrument,
        previous: Option<f64>,
    ) -> CurveResult<f64> {
        let objective = |x: f64| -> f64 {
            nodes
                .trial(settings, i, len, x)
                .and_then(|curve| instrument.residual(&curve))
                .unwrap_or(f64::NAN)
        };

        let (guess, bracket, floor) = Self::search_window(settings, nodes, i, previous);
        let result = solve_with_expansion(
            self.solver.as_ref(),
            &objective,
            guess,
            bracket,
            floor,
            &self.config.solver,
        )
        .map_err(|e| {
            CurveError::non_convergence(nodes.dates[i], instrument.description(), e.to_string())
        })?;

        Ok(result.root)
    }

    /// Initial guess, bracket and lower floor for node `i`.
    fn search_window(
        settings: &CurveSettings,
        nodes: &Nodes,
        i: usize,
        previous: Option<f64>,
    ) -> (f64, (f64, f64), Option<f64>) {
        match settings.bootstrap_trait {
            BootstrapTrait::Discount => {
                let prev_df = nodes.values[i - 1];
                let t_prev = nodes.times[i - 1];
                let dt = nodes.times[i] - t_prev;
                let zero = if t_prev > 0.0 {
                    -prev_df.ln() / t_prev
                } else {
                    SEED_RATE
                };
                let lo = (prev_df * (-0.5 * dt).exp()).max(DISCOUNT_FLOOR);
                let hi = prev_df * (0.2 * dt).exp();
                let guess = previous
                    .unwrap_or(prev_df * (-zero * dt).exp())
                    .clamp(lo, hi);
                (guess, (lo, hi), Some(DISCOUNT_FLOOR))
            }
            BootstrapTrait::ZeroRate | BootstrapTrait::ForwardRate => {
                let positive = settings.interpolation.requires_positive();
                let bracket = if positive { (LOG_RATE_FLOOR, 1.0) } else { (-0.5, 1.0) };
                let seed = if i > 1 { nodes.values[i - 1] } else { SEED_RATE };
                let guess = previous.unwrap_or(seed).clamp(bracket.0, bracket.1);
                (guess, bracket, positive.then_some(LOG_RATE_FLOOR))
            }
        }
    }
}

impl Nodes {
    /// Stores node `i`, mirroring node 0 where the trait requires it.
    fn set(&mut self, bootstrap_trait: BootstrapTrait, i: usize, value: f64) {
        self.values[i] = value;
        if i == 1 && bootstrap_trait.mirrors_first_node() {
            self.values[0] = value;
        }
    }

    /// Curve on the first `len` nodes with node `i` set to `x`.
    fn trial(
        &self,
        settings: &CurveSettings,
        i: usize,
        len: usize,
        x: f64,
    ) -> CurveResult<PiecewiseCurve> {
        let mut values = self.values[..len].to_vec();
        values[i] = x;
        if i == 1 && settings.bootstrap_trait.mirrors_first_node() {
            values[0] = x;
        }
        PiecewiseCurve::from_nodes(
            *settings,
            self.dates[..len].to_vec(),
            self.times[..len].to_vec(),
            values,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Deposit, Fra, RateFuture};
    use crate::interpolation::InterpolationScheme;
    use approx::assert_relative_eq;
    use strata_math::solvers::{HybridSolver, NewtonSolver};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn reference() -> Date {
        d(2024, 1, 2)
    }

    fn money_market() -> Vec<CalibrationInstrument> {
        let r = reference();
        vec![
            Deposit::new(r, d(2024, 4, 2), 0.040).into(),
            Deposit::new(r, d(2024, 7, 2), 0.041).into(),
            Fra::new(d(2024, 7, 2), d(2025, 1, 2), 0.043).into(),
            RateFuture::new(d(2025, 1, 2), d(2025, 4, 2), 0.044).into(),
        ]
    }

    fn assert_reprices(curve: &PiecewiseCurve, instruments: &[CalibrationInstrument]) {
        for instrument in instruments {
            let implied = instrument.implied_quote(curve).unwrap();
            assert_relative_eq!(implied, instrument.quote(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_every_combination_reprices() {
        let instruments = money_market();
        for bootstrap_trait in BootstrapTrait::all() {
            for scheme in InterpolationScheme::all() {
                let settings = CurveSettings::new(reference())
                    .with_trait(*bootstrap_trait)
                    .with_interpolation(*scheme);
                if settings.validate().is_err() {
                    continue;
                }
                let curve = Bootstrapper::default()
                    .bootstrap("MM", settings, instruments.clone())
                    .unwrap();
                assert_relative_eq!(curve.discount(reference()).unwrap(), 1.0, epsilon = 1e-10);
                assert_reprices(&curve, &instruments);
            }
        }
    }

    #[test]
    fn test_solvers_agree() {
        let settings = CurveSettings::new(reference());
        let instruments = money_market();
        let brent = Bootstrapper::default()
            .bootstrap("MM", settings, instruments.clone())
            .unwrap();
        for solver in [
            Arc::new(NewtonSolver) as Arc<dyn RootSolver>,
            Arc::new(HybridSolver),
        ] {
            let other = Bootstrapper::new(solver)
                .bootstrap("MM", settings, instruments.clone())
                .unwrap();
            for (a, b) in brent.node_values().iter().zip(other.node_values()) {
                assert_relative_eq!(a, b, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_duplicates_and_expired_pillars_skipped() {
        let r = reference();
        let instruments: Vec<CalibrationInstrument> = vec![
            Deposit::new(r, d(2024, 7, 2), 0.041).into(),
            Deposit::new(r, d(2024, 4, 2), 0.040).into(),
            Deposit::new(r, d(2024, 7, 2), 0.090).into(),
            Deposit::new(d(2023, 10, 2), r, 0.030).into(),
        ];
        let curve = Bootstrapper::default()
            .bootstrap("DUP", CurveSettings::new(r), instruments)
            .unwrap();

        assert_eq!(curve.pillar_dates(), &[d(2024, 4, 2), d(2024, 7, 2)]);
        // The first 6M deposit wins
        let kept = Deposit::new(r, d(2024, 7, 2), 0.041);
        assert_relative_eq!(kept.implied_quote(&curve).unwrap(), 0.041, epsilon = 1e-12);
    }

    #[test]
    fn test_no_pillars_is_an_error() {
        let r = reference();
        let expired: Vec<CalibrationInstrument> =
            vec![Deposit::new(d(2023, 10, 2), r, 0.03).into()];
        let err = Bootstrapper::default()
            .bootstrap("EMPTY", CurveSettings::new(r), expired)
            .unwrap_err();
        assert!(matches!(err, CurveError::InsufficientPillars { .. }));
    }

    #[test]
    fn test_unsupported_combination_rejected() {
        let settings = CurveSettings::new(reference())
            .with_trait(BootstrapTrait::ForwardRate)
            .with_interpolation(InterpolationScheme::ForwardFlat);
        let err = Bootstrapper::default()
            .bootstrap("FWD", settings, money_market())
            .unwrap_err();
        assert!(matches!(err, CurveError::UnsupportedCombination { .. }));
    }

    #[test]
    fn test_non_convergence_names_pillar() {
        let r = reference();
        // A rate this negative needs a discount factor far above one
        let instruments: Vec<CalibrationInstrument> = vec![
            Deposit::new(r, d(2024, 7, 2), 0.04).into(),
            Fra::new(d(2024, 7, 2), d(2025, 1, 2), -50.0).into(),
        ];
        let settings = CurveSettings::new(r).with_interpolation(InterpolationScheme::LogCubic);
        let config = BootstrapConfig::default().with_max_iterations(5);
        let err = Bootstrapper::default()
            .with_config(config)
            .bootstrap("BAD", settings, instruments)
            .unwrap_err();
        assert!(err.is_non_convergence());
        if let CurveError::NonConvergence { pillar, .. } = err {
            assert_eq!(pillar, d(2025, 1, 2));
        }
    }

    #[test]
    fn test_extrapolation_flag_carried_to_result() {
        let settings = CurveSettings::new(reference()).with_extrapolation(false);
        let curve = Bootstrapper::default()
            .bootstrap("MM", settings, money_market())
            .unwrap();
        assert!(!curve.allows_extrapolation());
        assert!(curve.discount(d(2030, 1, 2)).is_err());
    }
}
