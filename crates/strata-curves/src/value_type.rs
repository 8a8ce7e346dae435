//! What a curve's nodes represent.
//!
//! A bootstrapped curve solves one number per pillar. The [`BootstrapTrait`]
//! fixes the space that number lives in and how it maps back to discount
//! factors:
//!
//! | Trait | Node | Discount factor |
//! |-------|------|-----------------|
//! | `Discount` | `P(t)` | the node itself |
//! | `ZeroRate` | continuous zero `z(t)` | `exp(-z(t)·t)` |
//! | `ForwardRate` | instantaneous forward `f(t)` | `exp(-∫f)` |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::interpolation::InterpolationScheme;

/// The quantity interpolated between pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BootstrapTrait {
    /// Discount factors; the node at the reference date is 1.
    #[default]
    #[serde(alias = "DiscountFactor")]
    Discount,
    /// Continuously compounded zero rates on the curve day counter. The node
    /// at the reference date copies the first pillar.
    #[serde(alias = "ZeroYield")]
    ZeroRate,
    /// Instantaneous forward rates. The node at the reference date copies
    /// the first pillar.
    #[serde(alias = "InstantaneousForward")]
    ForwardRate,
}

impl BootstrapTrait {
    /// All traits.
    #[must_use]
    pub fn all() -> &'static [BootstrapTrait] {
        &[
            BootstrapTrait::Discount,
            BootstrapTrait::ZeroRate,
            BootstrapTrait::ForwardRate,
        ]
    }

    /// Node value at `t` that reproduces discount factor `df`, where the
    /// curve maps the node directly (Discount and ZeroRate).
    ///
    /// Returns `None` for `ForwardRate`, whose nodes must be solved.
    #[must_use]
    pub fn node_from_discount(&self, df: f64, t: f64) -> Option<f64> {
        match self {
            BootstrapTrait::Discount => Some(df),
            BootstrapTrait::ZeroRate if t > 0.0 => Some(-df.ln() / t),
            BootstrapTrait::ZeroRate | BootstrapTrait::ForwardRate => None,
        }
    }

    /// True when the reference-date node copies the first pillar's node.
    #[must_use]
    pub fn mirrors_first_node(&self) -> bool {
        !matches!(self, BootstrapTrait::Discount)
    }

    /// Checks that every pillar can be solved under `scheme`.
    ///
    /// Under forward-flat interpolation an instantaneous forward is carried
    /// to the right of its node, so the discount factor at a pillar only sees
    /// earlier nodes. Backward-flat discount factors are constant on each
    /// segment, so a helper starting after the previous pillar sees the new
    /// node at both ends and its rate no longer depends on it.
    #[must_use]
    pub fn supports(&self, scheme: InterpolationScheme) -> bool {
        self.unsupported_reason(scheme).is_none()
    }

    /// Why `scheme` cannot be bootstrapped under this trait, if it cannot.
    #[must_use]
    pub fn unsupported_reason(&self, scheme: InterpolationScheme) -> Option<&'static str> {
        match (self, scheme) {
            (BootstrapTrait::ForwardRate, InterpolationScheme::ForwardFlat) => {
                Some("a pillar's discount factor would not depend on its own node")
            }
            (BootstrapTrait::Discount, InterpolationScheme::BackwardFlat) => {
                Some("discount factors would be flat between pillars")
            }
            _ => None,
        }
    }
}

impl fmt::Display for BootstrapTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapTrait::Discount => "Discount",
            BootstrapTrait::ZeroRate => "ZeroRate",
            BootstrapTrait::ForwardRate => "ForwardRate",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_node_from_discount() {
        let df = (-0.03_f64 * 2.0).exp();
        assert_eq!(BootstrapTrait::Discount.node_from_discount(df, 2.0), Some(df));
        assert_relative_eq!(
            BootstrapTrait::ZeroRate.node_from_discount(df, 2.0).unwrap(),
            0.03,
            epsilon = 1e-15
        );
        assert!(BootstrapTrait::ForwardRate.node_from_discount(df, 2.0).is_none());
        assert!(BootstrapTrait::ZeroRate.node_from_discount(1.0, 0.0).is_none());
    }

    #[test]
    fn test_degenerate_combinations_rejected() {
        let mut valid = 0;
        for tr in BootstrapTrait::all() {
            for scheme in InterpolationScheme::all() {
                if tr.supports(*scheme) {
                    valid += 1;
                }
            }
        }
        assert_eq!(valid, 13);
        assert!(!BootstrapTrait::ForwardRate.supports(InterpolationScheme::ForwardFlat));
        assert!(!BootstrapTrait::Discount.supports(InterpolationScheme::BackwardFlat));
        assert!(BootstrapTrait::ZeroRate.supports(InterpolationScheme::BackwardFlat));
    }

    #[test]
    fn test_serde_names() {
        let tr: BootstrapTrait = serde_json::from_str("\"ZeroYield\"").unwrap();
        assert_eq!(tr, BootstrapTrait::ZeroRate);
        assert_eq!(serde_json::to_string(&BootstrapTrait::Discount).unwrap(), "\"Discount\"");
    }
}
