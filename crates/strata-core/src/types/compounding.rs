//! Compounding conventions and rate/discount-factor conversions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Frequency;
use crate::error::{CoreError, CoreResult};

/// Interest compounding convention.
///
/// Periodic conventions take their compounding frequency separately, as a
/// [`Frequency`], so an annually compounded rate is
/// `(Compounding::Compounded, Frequency::Annual)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// `1 + r·t`
    Simple,
    /// `(1 + r/f)^(f·t)`
    Compounded,
    /// `exp(r·t)`
    #[default]
    Continuous,
    /// Simple up to one period, compounded after.
    SimpleThenCompounded,
    /// Compounded up to one period, simple after.
    CompoundedThenSimple,
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Compounding::Simple => "Simple",
            Compounding::Compounded => "Compounded",
            Compounding::Continuous => "Continuous",
            Compounding::SimpleThenCompounded => "Simple-then-Compounded",
            Compounding::CompoundedThenSimple => "Compounded-then-Simple",
        };
        write!(f, "{name}")
    }
}

/// An interest rate together with its compounding convention.
///
/// # Example
///
/// ```rust
/// use strata_core::types::{Compounding, Frequency, InterestRate};
///
/// let rate = InterestRate::new(0.05, Compounding::Compounded, Frequency::Annual);
/// let df = rate.discount_factor(2.0).unwrap();
/// assert!((df - 1.0 / 1.05_f64.powi(2)).abs() < 1e-15);
///
/// let back = InterestRate::implied_from_discount(df, 2.0, Compounding::Compounded, Frequency::Annual)
///     .unwrap();
/// assert!((back.rate() - 0.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    rate: f64,
    compounding: Compounding,
    frequency: Frequency,
}

impl InterestRate {
    /// Creates an interest rate.
    #[must_use]
    pub fn new(rate: f64, compounding: Compounding, frequency: Frequency) -> Self {
        Self {
            rate,
            compounding,
            frequency,
        }
    }

    /// The rate as a decimal (0.05 for 5%).
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Compounding convention.
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// Compounding frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Growth of one unit over `t` years.
    pub fn compound_factor(&self, t: f64) -> CoreResult<f64> {
        if t < 0.0 {
            return Err(CoreError::invalid_rate(format!("negative time {t}")));
        }
        let r = self.rate;
        match self.compounding {
            Compounding::Simple => Ok(1.0 + r * t),
            Compounding::Continuous => Ok((r * t).exp()),
            Compounding::Compounded => {
                let f = periods(self.frequency)?;
                Ok((1.0 + r / f).powf(f * t))
            }
            Compounding::SimpleThenCompounded => {
                let f = periods(self.frequency)?;
                if t <= 1.0 / f {
                    Ok(1.0 + r * t)
                } else {
                    Ok((1.0 + r / f).powf(f * t))
                }
            }
            Compounding::CompoundedThenSimple => {
                let f = periods(self.frequency)?;
                if t <= 1.0 / f {
                    Ok((1.0 + r / f).powf(f * t))
                } else {
                    Ok(1.0 + r * t)
                }
            }
        }
    }

    /// Discount factor over `t` years.
    pub fn discount_factor(&self, t: f64) -> CoreResult<f64> {
        Ok(1.0 / self.compound_factor(t)?)
    }

    /// The rate that grows one unit into `compound` over `t` years.
    pub fn implied_from_compound(
        compound: f64,
        t: f64,
        compounding: Compounding,
        frequency: Frequency,
    ) -> CoreResult<Self> {
        if compound <= 0.0 {
            return Err(CoreError::invalid_rate(format!(
                "non-positive compound factor {compound}"
            )));
        }
        if t <= 0.0 {
            return Err(CoreError::invalid_rate(format!(
                "rate implied over non-positive time {t}"
            )));
        }

        let simple = |c: f64| (c - 1.0) / t;
        let compounded = |c: f64, f: f64| (c.powf(1.0 / (f * t)) - 1.0) * f;

        let rate = match compounding {
            Compounding::Simple => simple(compound),
            Compounding::Continuous => compound.ln() / t,
            Compounding::Compounded => compounded(compound, periods(frequency)?),
            Compounding::SimpleThenCompounded => {
                let f = periods(frequency)?;
                if t <= 1.0 / f {
                    simple(compound)
                } else {
                    compounded(compound, f)
                }
            }
            Compounding::CompoundedThenSimple => {
                let f = periods(frequency)?;
                if t <= 1.0 / f {
                    compounded(compound, f)
                } else {
                    simple(compound)
                }
            }
        };
        Ok(Self::new(rate, compounding, frequency))
    }

    /// The rate implied by a discount factor over `t` years.
    pub fn implied_from_discount(
        discount: f64,
        t: f64,
        compounding: Compounding,
        frequency: Frequency,
    ) -> CoreResult<Self> {
        if discount <= 0.0 {
            return Err(CoreError::invalid_rate(format!(
                "non-positive discount factor {discount}"
            )));
        }
        Self::implied_from_compound(1.0 / discount, t, compounding, frequency)
    }
}

fn periods(frequency: Frequency) -> CoreResult<f64> {
    frequency.periods_per_year().map(f64::from).ok_or_else(|| {
        CoreError::invalid_rate(format!("{frequency} is not a compounding frequency"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_simple_and_continuous() {
        let simple = InterestRate::new(0.04, Compounding::Simple, Frequency::Annual);
        assert_relative_eq!(simple.compound_factor(0.5).unwrap(), 1.02, epsilon = 1e-15);

        let cont = InterestRate::new(0.04, Compounding::Continuous, Frequency::Annual);
        assert_relative_eq!(
            cont.discount_factor(2.0).unwrap(),
            (-0.08_f64).exp(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_semiannual_compounding() {
        let rate = InterestRate::new(0.06, Compounding::Compounded, Frequency::Semiannual);
        assert_relative_eq!(
            rate.compound_factor(1.0).unwrap(),
            1.03 * 1.03,
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_mixed_conventions_switch_at_one_period() {
        let rate = InterestRate::new(0.05, Compounding::SimpleThenCompounded, Frequency::Quarterly);
        assert_relative_eq!(rate.compound_factor(0.2).unwrap(), 1.01, epsilon = 1e-15);
        assert_relative_eq!(
            rate.compound_factor(1.0).unwrap(),
            1.0125_f64.powi(4),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_once_is_not_a_compounding_frequency() {
        let rate = InterestRate::new(0.05, Compounding::Compounded, Frequency::Once);
        assert!(rate.compound_factor(1.0).is_err());
    }

    #[test]
    fn test_implied_rejects_degenerate_inputs() {
        assert!(InterestRate::implied_from_discount(0.0, 1.0, Compounding::Simple, Frequency::Annual).is_err());
        assert!(InterestRate::implied_from_discount(0.9, 0.0, Compounding::Simple, Frequency::Annual).is_err());
    }

    proptest! {
        #[test]
        fn prop_discount_inversion(
            r in -0.01f64..0.20,
            t in 0.01f64..40.0,
            which in 0usize..5,
        ) {
            let compounding = [
                Compounding::Simple,
                Compounding::Compounded,
                Compounding::Continuous,
                Compounding::SimpleThenCompounded,
                Compounding::CompoundedThenSimple,
            ][which];
            let rate = InterestRate::new(r, compounding, Frequency::Semiannual);
            let df = rate.discount_factor(t).unwrap();
            let back = InterestRate::implied_from_discount(df, t, compounding, Frequency::Semiannual).unwrap();
            prop_assert!((back.rate() - r).abs() < 1e-9);
        }
    }
}
