//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! solver = "hybrid"
//! tolerance = 1e-12
//! max_iterations = 100
//! max_passes = 50
//! parallel = true
//! worker_threads = 0
//! timeout_ms = 2000
//! strict_queries = false
//! max_range_points = 50000
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strata_curves::bootstrap::{BootstrapConfig, Bootstrapper};
use strata_math::solvers::{BrentSolver, HybridSolver, NewtonSolver, RootSolver, SolverConfig};

use crate::error::{EngineError, EngineResult};

/// Root finder used for non-closed-form pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Brent's method.
    #[default]
    Brent,
    /// Newton-Raphson with a numerical derivative.
    Newton,
    /// Newton steps safeguarded by bisection.
    Hybrid,
}

impl SolverKind {
    /// The solver behind this kind.
    #[must_use]
    pub fn solver(&self) -> Arc<dyn RootSolver> {
        match self {
            Self::Brent => Arc::new(BrentSolver),
            Self::Newton => Arc::new(NewtonSolver),
            Self::Hybrid => Arc::new(HybridSolver),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Root solver.
    #[serde(default)]
    pub solver: SolverKind,

    /// Solver tolerance.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Solver iteration cap per pillar.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Pass cap for non-local interpolation.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,

    /// Bootstrap independent curves concurrently.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Worker threads for parallel waves; 0 uses rayon's global pool.
    #[serde(default)]
    pub worker_threads: usize,

    /// Batch deadline in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Fail a curve's result on any grid point failure.
    #[serde(default)]
    pub strict_queries: bool,

    /// Largest grid a date range may expand to.
    #[serde(default = "default_max_range_points")]
    pub max_range_points: usize,
}

fn default_tolerance() -> f64 {
    1e-12
}

fn default_max_iterations() -> u32 {
    100
}

fn default_max_passes() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_max_range_points() -> usize {
    50_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::default(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            max_passes: default_max_passes(),
            parallel: true,
            worker_threads: 0,
            timeout_ms: None,
            strict_queries: false,
            max_range_points: default_max_range_points(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EngineError::config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(EngineError::config("max_iterations must be at least 1"));
        }
        if self.max_passes == 0 {
            return Err(EngineError::config("max_passes must be at least 1"));
        }
        if self.max_range_points == 0 {
            return Err(EngineError::config("max_range_points must be at least 1"));
        }
        Ok(())
    }

    /// Batch deadline, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Bootstrap settings derived from this configuration.
    #[must_use]
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            solver: SolverConfig::new(self.tolerance, self.max_iterations),
            max_passes: self.max_passes,
        }
    }

    /// A bootstrapper using the configured solver.
    #[must_use]
    pub fn bootstrapper(&self) -> Bootstrapper {
        Bootstrapper::new(self.solver.solver()).with_config(self.bootstrap_config())
    }
}
