//! Write-once store of built curves.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use strata_curves::PiecewiseCurve;

use crate::error::{EngineError, EngineResult};

/// Built curves of one batch, one slot per requested curve.
///
/// Each slot is written at most once. Readers see either an empty slot or a
/// complete curve.
#[derive(Debug)]
pub struct CurveRegistry {
    ids: HashMap<String, usize>,
    curves: Vec<OnceLock<Arc<PiecewiseCurve>>>,
    fingerprints: Vec<OnceLock<String>>,
    failures: Vec<OnceLock<String>>,
}

impl CurveRegistry {
    /// Empty registry for `ids`, in request order.
    #[must_use]
    pub fn new<S: AsRef<str>>(ids: &[S]) -> Self {
        let n = ids.len();
        Self {
            ids: ids
                .iter()
                .enumerate()
                .map(|(i, id)| (id.as_ref().to_string(), i))
                .collect(),
            curves: (0..n).map(|_| OnceLock::new()).collect(),
            fingerprints: (0..n).map(|_| OnceLock::new()).collect(),
            failures: (0..n).map(|_| OnceLock::new()).collect(),
        }
    }

    /// Slot of curve `id`.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Publishes a built curve and its fingerprint.
    pub fn insert(
        &self,
        index: usize,
        curve: Arc<PiecewiseCurve>,
        fingerprint: String,
    ) -> EngineResult<()> {
        let slot = self
            .curves
            .get(index)
            .ok_or_else(|| EngineError::invalid_input(format!("no curve slot {index}")))?;
        slot.set(curve)
            .map_err(|_| EngineError::invalid_input(format!("curve slot {index} already written")))?;
        // fingerprint slots follow their curve slots
        let _ = self.fingerprints[index].set(fingerprint);
        Ok(())
    }

    /// Built curve in slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<PiecewiseCurve>> {
        self.curves.get(index)?.get().cloned()
    }

    /// Built curve `id`.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<Arc<PiecewiseCurve>> {
        self.get(self.index_of(id)?)
    }

    /// Fingerprint of the built curve in slot `index`.
    #[must_use]
    pub fn fingerprint(&self, index: usize) -> Option<&str> {
        self.fingerprints.get(index)?.get().map(String::as_str)
    }

    /// Records that curve `index` failed; `root_cause` is the curve id its
    /// dependents report.
    pub fn mark_failed(&self, index: usize, root_cause: impl Into<String>) {
        if let Some(failure) = self.failures.get(index) {
            let _ = failure.set(root_cause.into());
        }
    }

    /// Root cause recorded for failed curve `index`.
    #[must_use]
    pub fn root_cause(&self, index: usize) -> Option<&str> {
        self.failures.get(index)?.get().map(String::as_str)
    }

    /// Every built curve by id.
    #[must_use]
    pub fn built(&self) -> HashMap<String, Arc<PiecewiseCurve>> {
        self.ids
            .iter()
            .filter_map(|(id, &i)| Some((id.clone(), self.get(i)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::types::Date;
    use strata_curves::CurveSettings;

    fn flat_curve() -> Arc<PiecewiseCurve> {
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let pillar = Date::from_ymd(2025, 1, 2).unwrap();
        Arc::new(PiecewiseCurve::new(CurveSettings::new(reference), &[(pillar, 0.97)]).unwrap())
    }

    #[test]
    fn test_write_once() {
        let registry = CurveRegistry::new(&["EUR_OIS", "EUR_6M"]);
        assert!(registry.get(0).is_none());
        assert_eq!(registry.index_of("EUR_6M"), Some(1));

        registry.insert(0, flat_curve(), "abc".into()).unwrap();
        assert!(registry.get_by_id("EUR_OIS").is_some());
        assert_eq!(registry.fingerprint(0), Some("abc"));
        assert_eq!(registry.fingerprint(1), None);

        assert!(registry.insert(0, flat_curve(), "def".into()).is_err());
        assert!(registry.insert(7, flat_curve(), "def".into()).is_err());
        assert_eq!(registry.built().len(), 1);
    }

    #[test]
    fn test_failure_root_cause() {
        let registry = CurveRegistry::new(&["A", "B"]);
        registry.mark_failed(1, "B");
        registry.mark_failed(1, "A");
        assert_eq!(registry.root_cause(1), Some("B"));
        assert_eq!(registry.root_cause(0), None);
        assert!(registry.get_by_id("B").is_none());
    }
}
