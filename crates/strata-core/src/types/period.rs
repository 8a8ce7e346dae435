//! Periods and tenors (`1D`, `2W`, `6M`, `10Y`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Neg};
use std::str::FromStr;

use super::Date;
use crate::error::{CoreError, CoreResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days.
    Days,
    /// Weeks of seven calendar days.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

impl TimeUnit {
    fn suffix(self) -> char {
        match self {
            TimeUnit::Days => 'D',
            TimeUnit::Weeks => 'W',
            TimeUnit::Months => 'M',
            TimeUnit::Years => 'Y',
        }
    }
}

/// A signed length of time expressed in a single unit.
///
/// Serializes as its tenor string, so `"3M"` in a request deserializes to
/// `Period::months(3)`.
///
/// # Example
///
/// ```rust
/// use strata_core::types::{Period, TimeUnit};
///
/// let tenor: Period = "18m".parse().unwrap();
/// assert_eq!(tenor, Period::new(18, TimeUnit::Months));
/// assert_eq!(tenor.to_string(), "18M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// `n` calendar days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Signed length in `unit()`.
    #[must_use]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Unit of the period.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// True for a zero-length period of any unit.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.length == 0
    }

    /// Whole number of months, for month and year periods.
    #[must_use]
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            TimeUnit::Days | TimeUnit::Weeks => None,
        }
    }

    /// Rough length in years (365-day years, 12-month years).
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.length);
        match self.unit {
            TimeUnit::Days => n / 365.0,
            TimeUnit::Weeks => n * 7.0 / 365.0,
            TimeUnit::Months => n / 12.0,
            TimeUnit::Years => n,
        }
    }

    /// Moves `date` by this period without any business-day adjustment.
    ///
    /// Month and year moves clamp to the end of the target month.
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            TimeUnit::Days => Ok(date.add_days(i64::from(self.length))),
            TimeUnit::Weeks => Ok(date.add_days(7 * i64::from(self.length))),
            TimeUnit::Months => date.add_months(self.length),
            TimeUnit::Years => date.add_months(self.length * 12),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.length, self.unit.suffix())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();
        match upper.as_str() {
            "ON" | "O/N" => return Ok(Period::days(1)),
            "TN" | "T/N" => return Ok(Period::days(2)),
            _ => {}
        }

        let Some(last) = upper.chars().last() else {
            return Err(CoreError::invalid_period(s, "empty tenor"));
        };
        let unit = match last {
            'D' => TimeUnit::Days,
            'W' => TimeUnit::Weeks,
            'M' => TimeUnit::Months,
            'Y' => TimeUnit::Years,
            other => {
                return Err(CoreError::invalid_period(
                    s,
                    format!("unknown unit '{other}'"),
                ))
            }
        };

        let digits = &upper[..upper.len() - 1];
        let length = digits
            .parse::<i32>()
            .map_err(|_| CoreError::invalid_period(s, "length is not an integer"))?;
        Ok(Period::new(length, unit))
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Self::Output {
        Period::new(-self.length, self.unit)
    }
}

impl Mul<i32> for Period {
    type Output = Period;

    fn mul(self, rhs: i32) -> Self::Output {
        Period::new(self.length * rhs, self.unit)
    }
}
