//! Built-curve cache and curve fingerprints.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::json;
use sha2::{Digest, Sha256};
use strata_curves::PiecewiseCurve;

use crate::context::EvaluationContext;
use crate::contracts::{CurveSpec, HelperSpec};
use crate::error::{EngineError, EngineResult};
use crate::index_registry::IndexDefinition;

/// Store of built curves keyed by fingerprint.
///
/// Lookups happen before any helper is built; a hit is registered exactly
/// like a fresh bootstrap.
pub trait CurveCache: Send + Sync {
    /// Curve stored under `fingerprint`.
    fn get(&self, fingerprint: &str) -> Option<Arc<PiecewiseCurve>>;

    /// Stores `curve` under `fingerprint`.
    fn put(&self, fingerprint: String, curve: Arc<PiecewiseCurve>);
}

/// Process-local cache.
#[derive(Default)]
pub struct InMemoryCurveCache {
    curves: DashMap<String, Arc<PiecewiseCurve>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryCurveCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Lookups that found a curve.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Drops every cached curve.
    pub fn clear(&self) {
        self.curves.clear();
    }
}

impl CurveCache for InMemoryCurveCache {
    fn get(&self, fingerprint: &str) -> Option<Arc<PiecewiseCurve>> {
        let found = self.curves.get(fingerprint).map(|c| Arc::clone(c.value()));
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    fn put(&self, fingerprint: String, curve: Arc<PiecewiseCurve>) {
        self.curves.insert(fingerprint, curve);
    }
}

impl std::fmt::Debug for InMemoryCurveCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCurveCache")
            .field("curves", &self.curves.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

/// SHA-256 (hex) identifying everything a curve's bootstrap depends on.
///
/// Covers the curve definition with quote ids replaced by their values,
/// the evaluation date and batch defaults, referenced index definitions,
/// the fingerprints of the curves it discounts off and the solver settings.
pub fn fingerprint(
    spec: &CurveSpec,
    context: &EvaluationContext,
    dependency_fingerprints: &[&str],
) -> EngineResult<String> {
    let mut resolved = spec.clone();
    resolved.helpers = spec
        .helpers
        .iter()
        .map(|h| h.with_resolved_quote(&context.quotes))
        .collect();

    let mut indices: Vec<&IndexDefinition> = spec
        .helpers
        .iter()
        .filter_map(HelperSpec::index)
        .filter_map(|id| context.indices.resolve(id).ok())
        .collect();
    indices.sort_by(|a, b| a.id.cmp(&b.id));
    indices.dedup_by(|a, b| a.id == b.id);

    let config = &context.config;
    let document = json!({
        "spec": resolved,
        "evaluation_date": context.evaluation_date,
        "calendar": context.calendar,
        "convention": context.convention,
        "indices": indices,
        "dependencies": dependency_fingerprints,
        "solver": {
            "kind": config.solver,
            "tolerance": config.tolerance,
            "max_iterations": config.max_iterations,
            "max_passes": config.max_passes,
        },
    });
    // object keys serialize sorted
    let canonical = serde_json::to_vec(&document)
        .map_err(|e| EngineError::invalid_input(format!("fingerprint: {e}")))?;

    Ok(hex::encode(Sha256::digest(&canonical)))
}
