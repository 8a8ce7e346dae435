//! Collects one result per requested curve.

use parking_lot::Mutex;
use strata_curves::{Curve, PiecewiseCurve};

use crate::contracts::{BatchResponse, CurveOutput};
use crate::error::EngineError;
use crate::query::QueryResult;

/// Result slots in request order.
///
/// Written from worker threads; each slot is filled once. Slots never
/// filled come back as cancelled.
#[derive(Debug)]
pub struct ErrorReporter {
    ids: Vec<String>,
    slots: Mutex<Vec<Option<CurveOutput>>>,
}

impl ErrorReporter {
    /// Empty slots for `ids`.
    #[must_use]
    pub fn new(ids: Vec<String>) -> Self {
        let slots = Mutex::new(vec![None; ids.len()]);
        Self { ids, slots }
    }

    /// Records a built and queried curve.
    pub fn record_success(&self, index: usize, curve: &PiecewiseCurve, result: QueryResult) {
        let output = CurveOutput {
            id: self.ids[index].clone(),
            reference_date: Some(curve.reference_date()),
            grid_dates: result.grid_dates,
            pillar_dates: curve.pillar_dates().to_vec(),
            series: result.series,
            point_errors: result.point_errors,
            error: None,
        };
        self.store(index, output);
    }

    /// Records a failure; `curve` is set when it was built before failing.
    pub fn record_failure(&self, index: usize, curve: Option<&PiecewiseCurve>, error: &EngineError) {
        let id = &self.ids[index];
        tracing::warn!(curve = %id, kind = %error.kind(), error = %error, "curve failed");
        let output = CurveOutput {
            id: id.clone(),
            reference_date: curve.map(|c| c.reference_date()),
            grid_dates: Vec::new(),
            pillar_dates: curve.map(|c| c.pillar_dates().to_vec()).unwrap_or_default(),
            series: Vec::new(),
            point_errors: Vec::new(),
            error: Some(error.info()),
        };
        self.store(index, output);
    }

    fn store(&self, index: usize, output: CurveOutput) {
        let mut slots = self.slots.lock();
        if slots[index].is_none() {
            slots[index] = Some(output);
        }
    }

    /// The response, cancelling every slot never written.
    #[must_use]
    pub fn finish(self) -> BatchResponse {
        let slots = self.slots.into_inner();
        let results = slots
            .into_iter()
            .zip(self.ids)
            .map(|(slot, id)| {
                slot.unwrap_or_else(|| CurveOutput {
                    error: Some(EngineError::cancelled(id.as_str()).info()),
                    id,
                    reference_date: None,
                    grid_dates: Vec::new(),
                    pillar_dates: Vec::new(),
                    series: Vec::new(),
                    point_errors: Vec::new(),
                })
            })
            .collect();
        BatchResponse { results }
    }
}
