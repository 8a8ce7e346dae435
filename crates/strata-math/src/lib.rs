//! # Strata Math
//!
//! Numerical building blocks for curve bootstrapping.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent, Newton-Raphson and a Newton/Brent hybrid, exposed
//!   both as functions and behind the object-safe [`solvers::RootSolver`]
//!   strategy so callers can inject the root finder
//! - **Interpolation**: linear, log-linear, backward-flat, forward-flat,
//!   monotone cubic and log-cubic interpolators, each able to integrate
//!   itself from the first node

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        BackwardFlatInterpolator, ForwardFlatInterpolator, Interpolator, LinearInterpolator,
        LogCubicInterpolator, LogLinearInterpolator, MonotoneCubicInterpolator,
    };
    pub use crate::solvers::{
        brent, hybrid, newton_raphson, newton_raphson_numerical, solve_with_expansion,
        BrentSolver, HybridSolver, NewtonSolver, RootSolver, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
