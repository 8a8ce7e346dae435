//! Read-only market snapshot shared by every curve in a batch.

use strata_core::calendars::{BusinessDayConvention, Calendar, CalendarId};
use strata_core::types::Date;

use crate::config::EngineConfig;
use crate::contracts::BatchRequest;
use crate::error::{EngineError, EngineResult};
use crate::index_registry::IndexRegistry;
use crate::quote_registry::QuoteRegistry;

/// Evaluation date, defaults, registries and configuration.
///
/// Built once before any curve is scheduled and only read afterwards.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Date every helper is anchored on.
    pub evaluation_date: Date,
    /// Calendar used where a helper or grid names none.
    pub calendar: CalendarId,
    /// Convention used where a helper or grid names none.
    pub convention: BusinessDayConvention,
    /// Quote table.
    pub quotes: QuoteRegistry,
    /// Index table.
    pub indices: IndexRegistry,
    /// Engine configuration.
    pub config: EngineConfig,
}

impl EvaluationContext {
    /// Builds the context; anything missing or repeated is a request error.
    pub fn from_request(request: &BatchRequest, config: EngineConfig) -> EngineResult<Self> {
        let evaluation_date = request
            .as_of_date
            .ok_or_else(|| EngineError::invalid_request("missing evaluation date"))?;
        Ok(Self {
            evaluation_date,
            calendar: request.calendar,
            convention: request.convention,
            quotes: QuoteRegistry::from_quotes(&request.quotes)?,
            indices: IndexRegistry::from_definitions(&request.indices)?,
            config,
        })
    }

    /// `calendar`, or the batch default.
    #[must_use]
    pub fn calendar_or_default(&self, calendar: Option<CalendarId>) -> &'static dyn Calendar {
        calendar.unwrap_or(self.calendar).calendar()
    }

    /// `convention`, or the batch default.
    #[must_use]
    pub fn convention_or_default(
        &self,
        convention: Option<BusinessDayConvention>,
    ) -> BusinessDayConvention {
        convention.unwrap_or(self.convention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_requires_evaluation_date() {
        let request: BatchRequest = serde_json::from_value(json!({ "curves": [] })).unwrap();
        let err = EvaluationContext::from_request(&request, EngineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_defaults() {
        let request: BatchRequest = serde_json::from_value(json!({
            "as_of_date": "2024-01-02",
            "calendar": "UnitedKingdom",
            "quotes": [{ "id": "A", "value": 0.01 }],
            "curves": []
        }))
        .unwrap();
        let context = EvaluationContext::from_request(&request, EngineConfig::default()).unwrap();

        assert_eq!(context.evaluation_date, Date::from_ymd(2024, 1, 2).unwrap());
        assert_eq!(
            context.convention_or_default(None),
            BusinessDayConvention::ModifiedFollowing
        );
        assert_eq!(
            context.convention_or_default(Some(BusinessDayConvention::Following)),
            BusinessDayConvention::Following
        );
        assert_eq!(
            context.calendar_or_default(None).name(),
            CalendarId::UnitedKingdom.calendar().name()
        );
        assert_eq!(context.quotes.get("A"), Some(0.01));
    }
}
