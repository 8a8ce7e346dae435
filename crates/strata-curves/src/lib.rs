//! # Strata Curves
//!
//! Piecewise term structures and the bootstrap that calibrates them.
//!
//! This crate provides:
//!
//! - **Curves**: [`PiecewiseCurve`], a solved curve answering discount
//!   factor, zero rate and forward rate queries through the [`Curve`] trait
//! - **Bootstrap traits**: nodes held as discount factors, zero rates or
//!   instantaneous forwards ([`BootstrapTrait`])
//! - **Interpolation**: linear, log-linear, backward/forward flat and
//!   monotone log-cubic ([`InterpolationScheme`])
//! - **Instruments**: deposits, FRAs, futures, swaps, OIS and fixed-rate
//!   bonds, gathered in the closed [`CalibrationInstrument`] enum
//! - **Bootstrapping**: the pillar-by-pillar [`Bootstrapper`] with an
//!   injected root solver
//!
//! ## Example
//!
//! ```rust
//! use strata_core::types::Date;
//! use strata_curves::prelude::*;
//!
//! let reference = Date::from_ymd(2024, 1, 2).unwrap();
//! let instruments: Vec<CalibrationInstrument> = vec![
//!     Deposit::new(reference, Date::from_ymd(2024, 4, 2).unwrap(), 0.040).into(),
//!     Fra::new(
//!         Date::from_ymd(2024, 4, 2).unwrap(),
//!         Date::from_ymd(2024, 10, 2).unwrap(),
//!         0.042,
//!     )
//!     .into(),
//! ];
//!
//! let settings = CurveSettings::new(reference).with_interpolation(InterpolationScheme::LogLinear);
//! let curve = Bootstrapper::default()
//!     .bootstrap("USD_3M", settings, instruments)
//!     .unwrap();
//!
//! let df = curve.discount(Date::from_ymd(2024, 7, 2).unwrap()).unwrap();
//! assert!(df > 0.975 && df < 0.985);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod curves;
pub mod error;
pub mod instruments;
pub mod interpolation;
pub mod traits;
pub mod value_type;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{BootstrapConfig, Bootstrapper, CurveState, NodeMethod};
    pub use crate::curves::{CurveSettings, PiecewiseCurve};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{
        BondCashFlow, CalibrationInstrument, CurveInstrument, Deposit, FixedRateBond, Fra,
        InstrumentType, OvernightIndexedSwap, RateFuture, Swap,
    };
    pub use crate::interpolation::InterpolationScheme;
    pub use crate::traits::Curve;
    pub use crate::value_type::BootstrapTrait;
}

pub use bootstrap::{Bootstrapper, CurveState};
pub use curves::{CurveSettings, PiecewiseCurve};
pub use error::{CurveError, CurveResult};
pub use instruments::{
    CalibrationInstrument, CurveInstrument, Deposit, FixedRateBond, Fra, InstrumentType,
    OvernightIndexedSwap, RateFuture, Swap,
};
pub use interpolation::InterpolationScheme;
pub use traits::Curve;
pub use value_type::BootstrapTrait;
