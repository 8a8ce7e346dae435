//! Interpolation schemes for piecewise curves.

use serde::{Deserialize, Serialize};
use strata_math::interpolation::{
    BackwardFlatInterpolator, ForwardFlatInterpolator, Interpolator, LinearInterpolator,
    LogCubicInterpolator, LogLinearInterpolator,
};
use strata_math::MathResult;

/// Interpolation between curve nodes, applied in the bootstrap trait's space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationScheme {
    /// Linear in the node value.
    Linear,
    /// Linear in the logarithm of the node value.
    #[default]
    LogLinear,
    /// Each segment takes the value of its right node.
    BackwardFlat,
    /// Each segment takes the value of its left node.
    ForwardFlat,
    /// Monotone cubic on the logarithm of the node value.
    #[serde(alias = "MonotonicLogCubic")]
    LogCubic,
}

impl InterpolationScheme {
    /// All schemes.
    #[must_use]
    pub fn all() -> &'static [InterpolationScheme] {
        &[
            InterpolationScheme::Linear,
            InterpolationScheme::LogLinear,
            InterpolationScheme::BackwardFlat,
            InterpolationScheme::ForwardFlat,
            InterpolationScheme::LogCubic,
        ]
    }

    /// True if node values must be strictly positive.
    #[must_use]
    pub fn requires_positive(&self) -> bool {
        matches!(self, Self::LogLinear | Self::LogCubic)
    }

    /// True if moving one node changes segments beyond its neighbours'
    /// right edge, so a pillar-by-pillar solve needs repeated passes.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::LogCubic)
    }

    /// Builds the interpolator over `(xs, ys)`.
    pub fn build(&self, xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Box<dyn Interpolator>> {
        Ok(match self {
            Self::Linear => Box::new(LinearInterpolator::new(xs, ys)?),
            Self::LogLinear => Box::new(LogLinearInterpolator::new(xs, ys)?),
            Self::BackwardFlat => Box::new(BackwardFlatInterpolator::new(xs, ys)?),
            Self::ForwardFlat => Box::new(ForwardFlatInterpolator::new(xs, ys)?),
            Self::LogCubic => Box::new(LogCubicInterpolator::new(xs, ys)?),
        })
    }
}

impl std::fmt::Display for InterpolationScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
            Self::BackwardFlat => "Backward-Flat",
            Self::ForwardFlat => "Forward-Flat",
            Self::LogCubic => "Log-Cubic",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_every_scheme() {
        let xs = vec![0.0, 1.0, 2.0, 5.0];
        let ys = vec![1.0, 0.97, 0.94, 0.85];
        for scheme in InterpolationScheme::all() {
            let interp = scheme.build(xs.clone(), ys.clone()).unwrap();
            for (x, y) in xs.iter().zip(&ys) {
                assert!((interp.interpolate(*x).unwrap() - y).abs() < 1e-12, "{scheme}");
            }
        }
    }

    #[test]
    fn test_log_schemes_reject_non_positive() {
        let xs = vec![0.0, 1.0];
        let ys = vec![0.01, -0.01];
        assert!(InterpolationScheme::LogLinear.build(xs.clone(), ys.clone()).is_err());
        assert!(InterpolationScheme::LogCubic.build(xs.clone(), ys.clone()).is_err());
        assert!(InterpolationScheme::Linear.build(xs, ys).is_ok());
    }
}
