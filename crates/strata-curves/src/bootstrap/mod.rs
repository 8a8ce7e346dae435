//! Curve bootstrapping.
//!
//! The [`Bootstrapper`] solves one node per pillar, left to right, holding
//! the nodes already solved fixed. Simple-accrual instruments on local
//! interpolation are solved in closed form; everything else goes through
//! the injected root solver.
//!
//! Interpolation that is not local (log-cubic) makes every node depend on
//! its neighbours, so the pass over all pillars is repeated until the nodes
//! stop moving.

mod sequential;
mod state;

pub use sequential::Bootstrapper;
pub use state::CurveState;

use serde::{Deserialize, Serialize};
use strata_math::solvers::SolverConfig;

/// Default cap on bootstrap passes for non-local interpolation.
pub const DEFAULT_MAX_PASSES: u32 = 50;

/// Bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapConfig {
    /// Tolerance and iteration cap handed to the root solver.
    pub solver: SolverConfig,
    /// Maximum passes over the pillars for non-local interpolation.
    pub max_passes: u32,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl BootstrapConfig {
    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.solver.max_iterations = max_iterations;
        self
    }

    /// Sets the pass cap.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Node change below which repeated passes stop.
    #[must_use]
    pub fn pass_tolerance(&self) -> f64 {
        self.solver.tolerance.max(1e-10)
    }
}

/// How a pillar's node was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeMethod {
    /// Mapped directly from the instrument's target discount factor.
    ClosedForm,
    /// Found by the root solver.
    RootFind,
}
