//! Payment and compounding frequencies.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Period;

/// How often a payment or compounding event occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// A single payment at maturity.
    Once,
    /// Once per year.
    #[default]
    Annual,
    /// Twice per year.
    Semiannual,
    /// Every four months.
    EveryFourthMonth,
    /// Four times per year.
    Quarterly,
    /// Every two months.
    Bimonthly,
    /// Twelve times per year.
    Monthly,
    /// Every four weeks.
    EveryFourthWeek,
    /// Every two weeks.
    Biweekly,
    /// Every week.
    Weekly,
    /// Every calendar day.
    Daily,
}

impl Frequency {
    /// Events per year; `None` for [`Frequency::Once`].
    #[must_use]
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Frequency::Once => None,
            Frequency::Annual => Some(1),
            Frequency::Semiannual => Some(2),
            Frequency::EveryFourthMonth => Some(3),
            Frequency::Quarterly => Some(4),
            Frequency::Bimonthly => Some(6),
            Frequency::Monthly => Some(12),
            Frequency::EveryFourthWeek => Some(13),
            Frequency::Biweekly => Some(26),
            Frequency::Weekly => Some(52),
            Frequency::Daily => Some(365),
        }
    }

    /// Length of one period; `None` for [`Frequency::Once`].
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        match self {
            Frequency::Once => None,
            Frequency::Annual => Some(Period::years(1)),
            Frequency::Semiannual => Some(Period::months(6)),
            Frequency::EveryFourthMonth => Some(Period::months(4)),
            Frequency::Quarterly => Some(Period::months(3)),
            Frequency::Bimonthly => Some(Period::months(2)),
            Frequency::Monthly => Some(Period::months(1)),
            Frequency::EveryFourthWeek => Some(Period::weeks(4)),
            Frequency::Biweekly => Some(Period::weeks(2)),
            Frequency::Weekly => Some(Period::weeks(1)),
            Frequency::Daily => Some(Period::days(1)),
        }
    }

    /// Frequency matching a regular period, e.g. `6M` is semiannual.
    #[must_use]
    pub fn from_period(period: Period) -> Option<Self> {
        if let Some(months) = period.total_months() {
            return match months {
                12 => Some(Frequency::Annual),
                6 => Some(Frequency::Semiannual),
                4 => Some(Frequency::EveryFourthMonth),
                3 => Some(Frequency::Quarterly),
                2 => Some(Frequency::Bimonthly),
                1 => Some(Frequency::Monthly),
                _ => None,
            };
        }
        match period.unit() {
            super::TimeUnit::Weeks => match period.length() {
                4 => Some(Frequency::EveryFourthWeek),
                2 => Some(Frequency::Biweekly),
                1 => Some(Frequency::Weekly),
                _ => None,
            },
            super::TimeUnit::Days if period.length() == 1 => Some(Frequency::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::EveryFourthMonth => "Every-Fourth-Month",
            Frequency::Quarterly => "Quarterly",
            Frequency::Bimonthly => "Bimonthly",
            Frequency::Monthly => "Monthly",
            Frequency::EveryFourthWeek => "Every-Fourth-Week",
            Frequency::Biweekly => "Biweekly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Frequency::Semiannual.periods_per_year(), Some(2));
        assert_eq!(Frequency::Quarterly.periods_per_year(), Some(4));
        assert_eq!(Frequency::Once.periods_per_year(), None);
    }

    #[test]
    fn test_period_round_trip() {
        for freq in [
            Frequency::Annual,
            Frequency::Semiannual,
            Frequency::Quarterly,
            Frequency::Monthly,
            Frequency::Weekly,
            Frequency::Daily,
        ] {
            let period = freq.period().unwrap();
            assert_eq!(Frequency::from_period(period), Some(freq));
        }
        assert_eq!(Frequency::from_period(Period::years(1)), Some(Frequency::Annual));
        assert_eq!(Frequency::from_period(Period::months(5)), None);
    }
}
