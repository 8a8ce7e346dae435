//! Curve types.
//!
//! - [`PiecewiseCurve`]: nodes at pillar dates, interpolated in the space of
//!   its [`BootstrapTrait`](crate::value_type::BootstrapTrait), flat-forward
//!   beyond the last pillar
//! - [`CurveSettings`]: reference date, day counter, trait, scheme and
//!   extrapolation flag shared by a bootstrap and its result

mod piecewise;

pub use piecewise::{CurveSettings, PiecewiseCurve};
