//! Linear interpolation.

use super::{check_range, cumulative, segment, validate_nodes, Interpolator};
use crate::error::MathResult;

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-15);
/// assert!((interp.primitive(2.0).unwrap() - 3.0).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    integrals: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator over strictly increasing `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        let integrals = cumulative(
            xs.windows(2)
                .zip(ys.windows(2))
                .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1])),
        );
        Ok(Self { xs, ys, integrals })
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        Ok(self.ys[i] + (x - self.xs[i]) * self.slope(i))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        Ok(self.slope(segment(&self.xs, x)))
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        let dx = x - self.xs[i];
        Ok(self.integrals[i] + dx * (self.ys[i] + 0.5 * dx * self.slope(i)))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_midpoints_and_slope() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 3.0], vec![0.02, 0.03, 0.02]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.025, epsilon = 1e-15);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 0.025, epsilon = 1e-15);
        assert_relative_eq!(interp.derivative(0.5).unwrap(), 0.01, epsilon = 1e-15);
        assert_relative_eq!(interp.derivative(3.0).unwrap(), -0.005, epsilon = 1e-15);
    }

    #[test]
    fn test_primitive_is_trapezoid() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 3.0], vec![0.02, 0.03, 0.02]).unwrap();
        assert_relative_eq!(interp.primitive(1.0).unwrap(), 0.025, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(3.0).unwrap(), 0.025 + 0.05, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(2.0).unwrap(), 0.025 + 0.0275, epsilon = 1e-15);
    }
}
