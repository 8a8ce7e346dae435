//! Batch quote table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A market quote addressable by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote id.
    pub id: String,
    /// Quoted value: a rate, or a price for futures and bonds.
    pub value: f64,
}

/// Quote lookup built once per batch.
#[derive(Debug, Clone, Default)]
pub struct QuoteRegistry {
    quotes: HashMap<String, f64>,
}

impl QuoteRegistry {
    /// Builds the registry; a repeated id is a request error.
    pub fn from_quotes(quotes: &[Quote]) -> EngineResult<Self> {
        let mut map = HashMap::with_capacity(quotes.len());
        for quote in quotes {
            if !quote.value.is_finite() {
                return Err(EngineError::invalid_request(format!(
                    "quote '{}' is not finite",
                    quote.id
                )));
            }
            if map.insert(quote.id.clone(), quote.value).is_some() {
                return Err(EngineError::invalid_request(format!(
                    "duplicate quote id '{}'",
                    quote.id
                )));
            }
        }
        Ok(Self { quotes: map })
    }

    /// Value of quote `id`.
    pub fn resolve(&self, id: &str) -> EngineResult<f64> {
        self.quotes
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::invalid_quote(id))
    }

    /// The registry value when `quote_id` is set and non-empty, otherwise
    /// `inline`.
    pub fn value_or(&self, quote_id: Option<&str>, inline: Option<f64>) -> EngineResult<f64> {
        match quote_id.filter(|id| !id.is_empty()) {
            Some(id) => self.resolve(id),
            None => inline.ok_or_else(|| EngineError::invalid_input("helper has no quote")),
        }
    }

    /// Non-failing lookup used when fingerprinting.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.quotes.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn registry() -> QuoteRegistry {
        QuoteRegistry::from_quotes(&[
            Quote {
                id: "EUR_DEPO_3M".into(),
                value: 0.0385,
            },
            Quote {
                id: "ED_H4".into(),
                value: 95.2,
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_quote_id_wins_over_inline() {
        let quotes = registry();
        assert_eq!(quotes.value_or(Some("EUR_DEPO_3M"), Some(0.01)).unwrap(), 0.0385);
        assert_eq!(quotes.value_or(Some(""), Some(0.01)).unwrap(), 0.01);
        assert_eq!(quotes.value_or(None, Some(0.01)).unwrap(), 0.01);
        assert_eq!(
            quotes.value_or(None, None).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    fn test_unknown_quote() {
        let err = registry().resolve("USD_SWAP_5Y").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuoteReference);
        assert!(err.to_string().contains("Unknown quote id"));
    }

    #[test]
    fn test_duplicate_quote_is_fatal() {
        let q = Quote {
            id: "X".into(),
            value: 1.0,
        };
        let err = QuoteRegistry::from_quotes(&[q.clone(), q]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
