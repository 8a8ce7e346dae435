//! Batch orchestration.
//!
//! A batch runs in four steps:
//!
//! 1. validate the request and build the evaluation context,
//! 2. resolve curve dependencies into waves,
//! 3. bootstrap each wave, independent curves in parallel,
//! 4. query every built curve and collect one result per requested curve.
//!
//! Only request-level problems abort a batch; everything else ends up in
//! the failing curve's result.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use strata_core::types::Date;
use strata_curves::bootstrap::Bootstrapper;
use strata_curves::{CurveSettings, PiecewiseCurve};

use crate::cache::{fingerprint, CurveCache};
use crate::config::EngineConfig;
use crate::context::EvaluationContext;
use crate::contracts::{BatchRequest, BatchResponse, CurveRequest, CurveSpec};
use crate::error::{EngineError, EngineResult};
use crate::helper_factory::HelperFactory;
use crate::query::CurveQueryEngine;
use crate::registry::CurveRegistry;
use crate::reporter::ErrorReporter;
use crate::resolver::{DependencyResolver, Resolution};

/// Response plus the built curves, for downstream valuation.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    response: BatchResponse,
    curves: HashMap<String, Arc<PiecewiseCurve>>,
}

impl BatchOutcome {
    /// Built curve `id`.
    #[must_use]
    pub fn curve(&self, id: &str) -> Option<Arc<PiecewiseCurve>> {
        self.curves.get(id).cloned()
    }

    /// Ids of every built curve.
    pub fn curve_ids(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// The per-curve results.
    #[must_use]
    pub fn response(&self) -> &BatchResponse {
        &self.response
    }

    /// Consumes the outcome, keeping the results.
    #[must_use]
    pub fn into_response(self) -> BatchResponse {
        self.response
    }
}

/// Stop signal a caller can raise while a batch runs.
///
/// Checked before each wave, like the deadline: the running wave finishes
/// and every curve not yet scheduled is reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Token that has not been raised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the token; later calls are no-ops.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            tracing::debug!("batch cancellation requested");
        }
    }

    /// True once [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Shared state of one batch run.
struct Run<'a> {
    request: &'a BatchRequest,
    context: EvaluationContext,
    resolution: Resolution,
    registry: CurveRegistry,
    reporter: ErrorReporter,
}

/// Runs batches with a fixed configuration.
pub struct BatchRunner {
    config: EngineConfig,
    bootstrapper: Bootstrapper,
    pool: Option<rayon::ThreadPool>,
    cache: Option<Arc<dyn CurveCache>>,
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("solver", &self.bootstrapper.solver_name())
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl BatchRunner {
    /// Validates `config` and sets up the worker pool.
    ///
    /// With `worker_threads = 0` parallel waves use rayon's global pool.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let pool = if config.parallel && config.worker_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("strata-worker-{i}"))
                .build()
                .map_err(|e| EngineError::config(format!("worker pool: {e}")))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self {
            bootstrapper: config.bootstrapper(),
            config,
            pool,
            cache: None,
        })
    }

    /// Looks curves up in `cache` before building them.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CurveCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one batch.
    ///
    /// Fails only for request-level problems: a missing evaluation date, no
    /// curves, or a repeated curve, index or quote id.
    pub fn run(&self, request: &BatchRequest) -> EngineResult<BatchOutcome> {
        self.run_cancellable(request, &CancellationToken::new())
    }

    /// Runs one batch, stopping before the next wave once `token` is raised.
    pub fn run_cancellable(
        &self,
        request: &BatchRequest,
        token: &CancellationToken,
    ) -> EngineResult<BatchOutcome> {
        let started = Instant::now();
        if request.curves.is_empty() {
            return Err(EngineError::invalid_request("batch has no curves"));
        }
        let context = EvaluationContext::from_request(request, self.config.clone())?;
        let specs: Vec<CurveSpec> = request.curves.iter().map(|c| c.spec.clone()).collect();
        let resolution = DependencyResolver::resolve(&specs)?;

        let span = tracing::info_span!("batch", as_of = %context.evaluation_date);
        let _enter = span.enter();
        tracing::info!(
            curves = specs.len(),
            waves = resolution.waves.len(),
            solver = self.bootstrapper.solver_name(),
            "batch started"
        );

        let ids: Vec<String> = specs.iter().map(|s| s.id.clone()).collect();
        let run = Run {
            request,
            context,
            registry: CurveRegistry::new(&ids),
            reporter: ErrorReporter::new(ids),
            resolution,
        };

        for (i, verdict) in run.resolution.verdicts.iter().enumerate() {
            if let Some(e) = verdict {
                run.registry.mark_failed(i, root_cause(e, &specs[i].id));
                run.reporter.record_failure(i, None, e);
            }
        }

        let deadline = self.config.timeout().map(|t| started + t);
        for (number, wave) in run.resolution.waves.iter().enumerate() {
            let reason = if token.is_cancelled() {
                Some("cancelled by caller")
            } else if deadline.is_some_and(|d| Instant::now() >= d) {
                Some("deadline passed")
            } else {
                None
            };
            if let Some(reason) = reason {
                let remaining: usize = run.resolution.waves[number..].iter().map(Vec::len).sum();
                tracing::warn!(wave = number, remaining, reason, "cancelling batch");
                break;
            }
            tracing::debug!(wave = number, curves = wave.len(), "wave started");
            self.run_wave(&run, wave);
        }

        let Run {
            registry, reporter, ..
        } = run;
        let response = reporter.finish();
        let failed = response.results.iter().filter(|r| !r.is_ok()).count();
        tracing::info!(
            built = response.results.len() - failed,
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );

        Ok(BatchOutcome {
            response,
            curves: registry.built(),
        })
    }

    fn run_wave(&self, run: &Run<'_>, wave: &[usize]) {
        let job = |&index: &usize| self.process_curve(run, index);
        if self.config.parallel && wave.len() > 1 {
            match &self.pool {
                Some(pool) => pool.install(|| wave.par_iter().for_each(job)),
                None => wave.par_iter().for_each(job),
            }
        } else {
            wave.iter().for_each(job);
        }
    }

    fn process_curve(&self, run: &Run<'_>, index: usize) {
        let CurveRequest { spec, query } = &run.request.curves[index];

        // a dependency that failed while bootstrapping
        for &dep in &run.resolution.dependencies[index] {
            if run.registry.get(dep).is_none() {
                let dep_id = &run.request.curves[dep].spec.id;
                let root = run.registry.root_cause(dep).unwrap_or(dep_id).to_string();
                let e = EngineError::DependencyFailed {
                    curve: spec.id.clone(),
                    root_cause: root.clone(),
                };
                run.registry.mark_failed(index, root);
                run.reporter.record_failure(index, None, &e);
                return;
            }
        }

        let curve = match self.build_curve(run, index, spec) {
            Ok(curve) => curve,
            Err(e) => {
                run.registry.mark_failed(index, spec.id.clone());
                run.reporter.record_failure(index, None, &e);
                return;
            }
        };

        match CurveQueryEngine::new(&run.context).evaluate(&curve, query) {
            Ok(result) => run.reporter.record_success(index, &curve, result),
            Err(e) => run.reporter.record_failure(index, Some(&curve), &e),
        }
    }

    fn build_curve(
        &self,
        run: &Run<'_>,
        index: usize,
        spec: &CurveSpec,
    ) -> EngineResult<Arc<PiecewiseCurve>> {
        let dependencies: Vec<&str> = run.resolution.dependencies[index]
            .iter()
            .filter_map(|&dep| run.registry.fingerprint(dep))
            .collect();
        let key = fingerprint(spec, &run.context, &dependencies)?;

        if let Some(curve) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            tracing::debug!(curve = %spec.id, fingerprint = %key, "cache hit");
            run.registry.insert(index, Arc::clone(&curve), key)?;
            return Ok(curve);
        }

        if !spec.zero_points.is_empty() && !spec.helpers.is_empty() {
            return Err(EngineError::unsupported(format!(
                "curve '{}' mixes zero points with helpers",
                spec.id
            )));
        }

        let reference = spec.reference_date.unwrap_or(run.context.evaluation_date);
        let settings = CurveSettings::new(reference)
            .with_day_counter(spec.day_counter)
            .with_trait(spec.bootstrap_trait)
            .with_interpolation(spec.interpolation)
            .with_extrapolation(spec.extrapolate);

        let curve = if spec.zero_points.is_empty() {
            let instruments =
                HelperFactory::new(&run.context, &run.registry).build_all(&spec.id, &spec.helpers)?;
            self.bootstrapper.bootstrap(&spec.id, settings, instruments)?
        } else {
            let points: Vec<(Date, f64)> =
                spec.zero_points.iter().map(|p| (p.date, p.rate)).collect();
            tracing::debug!(curve = %spec.id, points = points.len(), "building from zero points");
            PiecewiseCurve::from_zero_points(settings, &points)?
        };

        let curve = Arc::new(curve);
        if let Some(cache) = &self.cache {
            cache.put(key.clone(), Arc::clone(&curve));
        }
        run.registry.insert(index, Arc::clone(&curve), key)?;
        Ok(curve)
    }
}

/// Curve id dependents of a failed curve report.
fn root_cause(error: &EngineError, curve: &str) -> String {
    match error {
        EngineError::DependencyFailed { root_cause, .. } => root_cause.clone(),
        _ => curve.to_string(),
    }
}
