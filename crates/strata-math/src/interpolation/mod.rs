//! Interpolation methods for curve construction.
//!
//! Every interpolator passes through its nodes, reports its slope and can
//! integrate itself from the first node ([`Interpolator::primitive`]). The
//! primitive is what turns interpolated instantaneous forwards into
//! discount factors.
//!
//! # Available Methods
//!
//! | Method | Continuity | Locality | Primitive |
//! |--------|-----------|----------|-----------|
//! | [`LinearInterpolator`] | C0 | local | exact |
//! | [`LogLinearInterpolator`] | C0 | local | exact |
//! | [`BackwardFlatInterpolator`] | step | local | exact |
//! | [`ForwardFlatInterpolator`] | step | local | exact |
//! | [`MonotoneCubicInterpolator`] | C1 | two segments | exact |
//! | [`LogCubicInterpolator`] | C1 | two segments | Gauss-Legendre |
//!
//! Queries outside `[min_x, max_x]` are rejected; extrapolation is the
//! caller's business.

mod flat;
mod linear;
mod log_linear;
mod monotone_cubic;

pub use flat::{BackwardFlatInterpolator, ForwardFlatInterpolator};
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use monotone_cubic::{LogCubicInterpolator, MonotoneCubicInterpolator};

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync + std::fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    ///
    /// At an interior node the slope of the segment to the right is used;
    /// at the last node, the slope of the last segment.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the integral of the interpolant from `min_x()` to `x`.
    fn primitive(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks node inputs shared by every interpolator.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64]) -> MathResult<()> {
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    if ys.iter().any(|y| !y.is_finite()) {
        return Err(MathError::invalid_input("y values must be finite"));
    }
    Ok(())
}

/// Rejects non-positive values for interpolators working on logarithms.
pub(crate) fn validate_positive(ys: &[f64]) -> MathResult<()> {
    match ys.iter().position(|&y| y <= 0.0) {
        Some(i) => Err(MathError::invalid_input(format!(
            "log interpolation requires positive values, got {} at node {}",
            ys[i], i
        ))),
        None => Ok(()),
    }
}

/// Fails for `x` outside `[xs[0], xs[n-1]]`.
pub(crate) fn check_range(xs: &[f64], x: f64) -> MathResult<()> {
    let (min, max) = (xs[0], xs[xs.len() - 1]);
    if x >= min && x <= max {
        Ok(())
    } else {
        Err(MathError::ExtrapolationNotAllowed { x, min, max })
    }
}

/// Index `i` of the segment `[xs[i], xs[i+1])` holding `x`; the last node
/// belongs to the last segment.
pub(crate) fn segment(xs: &[f64], x: f64) -> usize {
    xs.partition_point(|&node| node <= x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

/// Running integrals at each node from per-segment integrals.
pub(crate) fn cumulative(segment_integrals: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut acc = 0.0;
    std::iter::once(0.0)
        .chain(segment_integrals.map(|area| {
            acc += area;
            acc
        }))
        .collect()
}
