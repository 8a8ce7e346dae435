//! # Strata Engine
//!
//! Batch curve construction for Strata.
//!
//! A [`BatchRequest`](contracts::BatchRequest) carries an evaluation date,
//! index definitions, a quote table and the curves to build. The engine:
//!
//! - resolves quotes and indices ([`QuoteRegistry`], [`IndexRegistry`])
//! - orders curves by their discounting dependencies ([`DependencyResolver`])
//! - turns helper declarations into instruments ([`HelperFactory`])
//! - bootstraps each dependency wave, independent curves in parallel
//! - evaluates discount, zero and forward measures on date grids
//!   ([`CurveQueryEngine`])
//! - reports one result per requested curve ([`ErrorReporter`])
//!
//! ## Architecture
//!
//! ```text
//! BatchRequest ─> EvaluationContext ─> DependencyResolver ─> waves
//!                                                              │
//!                 ┌────────────────────────────────────────────┘
//!                 ▼
//!        HelperFactory ─> Bootstrapper ─> CurveRegistry ─> CurveQueryEngine
//!                                              │                   │
//!                                         BatchOutcome <─ ErrorReporter
//! ```
//!
//! ## Example
//!
//! ```rust
//! use strata_engine::prelude::*;
//!
//! let request: BatchRequest = serde_json::from_str(r#"{
//!     "as_of_date": "2024-01-02",
//!     "curves": [{
//!         "spec": {
//!             "id": "EUR_DEPO",
//!             "helpers": [
//!                 { "type": "deposit", "rate": 0.039, "tenor": "3M" },
//!                 { "type": "deposit", "rate": 0.038, "tenor": "6M" }
//!             ]
//!         },
//!         "query": {
//!             "grid": { "type": "tenors", "tenors": ["1M", "3M"] },
//!             "measures": [{ "measure": "discount" }]
//!         }
//!     }]
//! }"#).unwrap();
//!
//! let runner = BatchRunner::new(EngineConfig::default()).unwrap();
//! let outcome = runner.run(&request).unwrap();
//! let result = &outcome.response().results[0];
//! assert!(result.error.is_none());
//! assert_eq!(result.series[0].values.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod batch;
pub mod cache;
pub mod config;
pub mod context;
pub mod contracts;
pub mod error;
pub mod helper_factory;
pub mod index_registry;
pub mod query;
pub mod quote_registry;
pub mod registry;
pub mod reporter;
pub mod resolver;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchOutcome, BatchRunner, CancellationToken};
    pub use crate::cache::{CurveCache, InMemoryCurveCache};
    pub use crate::config::{EngineConfig, SolverKind};
    pub use crate::contracts::{
        BatchRequest, BatchResponse, CurveOutput, CurveQuery, CurveRequest, CurveSpec,
        ForwardPeriod, Grid, HelperSpec, Measure, PointError, Series, ZeroPoint,
    };
    pub use crate::error::{EngineError, EngineResult, ErrorInfo, ErrorKind};
    pub use crate::index_registry::{Fixing, IndexDefinition, IndexKind};
    pub use crate::quote_registry::Quote;
}

pub use batch::{BatchOutcome, BatchRunner, CancellationToken};
pub use cache::{CurveCache, InMemoryCurveCache};
pub use config::EngineConfig;
pub use context::EvaluationContext;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use helper_factory::HelperFactory;
pub use index_registry::IndexRegistry;
pub use query::CurveQueryEngine;
pub use quote_registry::QuoteRegistry;
pub use registry::CurveRegistry;
pub use reporter::ErrorReporter;
pub use resolver::DependencyResolver;
