//! Rate index definitions and their lookup table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use strata_core::daycounts::DayCountConvention;
use strata_core::types::{Date, Period};

use crate::error::{EngineError, EngineResult};

/// Term index or overnight index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Term index (Euribor, Libor).
    #[default]
    Ibor,
    /// Overnight index (ESTR, SOFR).
    Overnight,
}

/// One historical fixing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixing {
    /// Fixing date.
    pub date: Date,
    /// Fixed rate.
    pub value: f64,
}

/// A named rate index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Id helpers refer to.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Term or overnight.
    #[serde(default)]
    pub kind: IndexKind,
    /// Index tenor; `1D` for overnight indices.
    pub tenor: Period,
    /// Business days between fixing and value date.
    #[serde(default = "default_fixing_days")]
    pub fixing_days: u32,
    /// Fixing calendar.
    #[serde(default)]
    pub calendar: CalendarId,
    /// Business-day convention of the index period.
    #[serde(default = "default_convention")]
    pub convention: BusinessDayConvention,
    /// End-of-month rolling.
    #[serde(default)]
    pub end_of_month: bool,
    /// Accrual day counter.
    #[serde(default = "default_day_counter")]
    pub day_counter: DayCountConvention,
    /// ISO currency code.
    #[serde(default)]
    pub currency: String,
    /// Past fixings.
    #[serde(default)]
    pub fixings: Vec<Fixing>,
}

fn default_fixing_days() -> u32 {
    2
}

fn default_convention() -> BusinessDayConvention {
    BusinessDayConvention::ModifiedFollowing
}

fn default_day_counter() -> DayCountConvention {
    DayCountConvention::Act360
}

impl IndexDefinition {
    /// The fixing calendar.
    #[must_use]
    pub fn fixing_calendar(&self) -> &'static dyn Calendar {
        self.calendar.calendar()
    }

    /// Historical fixing on `date`, if supplied.
    #[must_use]
    pub fn fixing(&self, date: Date) -> Option<f64> {
        self.fixings.iter().find(|f| f.date == date).map(|f| f.value)
    }

    /// Date the index fixes for a period starting on `value_date`.
    #[must_use]
    pub fn fixing_date(&self, value_date: Date) -> Date {
        self.fixing_calendar()
            .add_business_days(value_date, -(self.fixing_days as i32))
    }

    /// Start of the period fixed on `fixing_date`.
    #[must_use]
    pub fn value_date(&self, fixing_date: Date) -> Date {
        self.fixing_calendar()
            .add_business_days(fixing_date, self.fixing_days as i32)
    }

    /// End of the index period starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> EngineResult<Date> {
        Ok(self.fixing_calendar().advance(
            value_date,
            self.tenor,
            self.convention,
            self.end_of_month,
        )?)
    }
}

/// Index lookup built once per batch.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    indices: HashMap<String, IndexDefinition>,
}

impl IndexRegistry {
    /// Builds the registry; a repeated id is a request error.
    pub fn from_definitions(definitions: &[IndexDefinition]) -> EngineResult<Self> {
        let mut indices = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if definition.id.is_empty() {
                return Err(EngineError::invalid_request("index definition without an id"));
            }
            if indices
                .insert(definition.id.clone(), definition.clone())
                .is_some()
            {
                return Err(EngineError::invalid_request(format!(
                    "duplicate index id '{}'",
                    definition.id
                )));
            }
        }
        Ok(Self { indices })
    }

    /// Looks up `id`.
    pub fn resolve(&self, id: &str) -> EngineResult<&IndexDefinition> {
        self.indices
            .get(id)
            .ok_or_else(|| EngineError::missing_index(id))
    }

    /// Looks up `id` and checks its kind.
    pub fn resolve_kind(&self, id: &str, kind: IndexKind) -> EngineResult<&IndexDefinition> {
        let index = self.resolve(id)?;
        if index.kind != kind {
            return Err(EngineError::unsupported(format!(
                "index '{id}' is {:?}, expected {kind:?}",
                index.kind
            )));
        }
        Ok(index)
    }

    /// Number of indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when no index is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn euribor_6m() -> IndexDefinition {
        serde_json::from_value(serde_json::json!({
            "id": "EUR_6M",
            "name": "Euribor 6M",
            "tenor": "6M",
            "calendar": "TARGET",
            "currency": "EUR",
            "fixings": [{ "date": "2024-01-02", "value": 0.0391 }]
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_from_json() {
        let index = euribor_6m();
        assert_eq!(index.kind, IndexKind::Ibor);
        assert_eq!(index.fixing_days, 2);
        assert_eq!(index.convention, BusinessDayConvention::ModifiedFollowing);
        assert_eq!(index.day_counter, DayCountConvention::Act360);
        assert_eq!(index.fixing(d(2024, 1, 2)), Some(0.0391));
        assert_eq!(index.fixing(d(2024, 1, 3)), None);
    }

    #[test]
    fn test_fixing_and_value_dates() {
        let index = euribor_6m();
        // Friday fixing settles on Tuesday
        assert_eq!(index.value_date(d(2024, 1, 5)), d(2024, 1, 9));
        assert_eq!(index.fixing_date(d(2024, 1, 9)), d(2024, 1, 5));
        assert_eq!(index.maturity_date(d(2024, 1, 9)).unwrap(), d(2024, 7, 9));
    }

    #[test]
    fn test_registry_lookup() {
        let mut ois = euribor_6m();
        ois.id = "ESTR".into();
        ois.kind = IndexKind::Overnight;
        let registry = IndexRegistry::from_definitions(&[euribor_6m(), ois]).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("EUR_6M").unwrap().currency, "EUR");
        assert_eq!(
            registry.resolve("USD_3M").unwrap_err().kind(),
            ErrorKind::MissingIndexReference
        );
        assert_eq!(
            registry.resolve_kind("ESTR", IndexKind::Ibor).unwrap_err().kind(),
            ErrorKind::UnsupportedHelperCombination
        );
    }

    #[test]
    fn test_duplicate_id_is_fatal() {
        let err = IndexRegistry::from_definitions(&[euribor_6m(), euribor_6m()]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
