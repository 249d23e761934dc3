//! Extraction result model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fields::CATALOG;

/// Wire form of a field whose label or value was not found.
pub const NOT_FOUND: &str = "No encontrado";

/// Value of one catalog field in an [`ExtractionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldValue {
    /// Text captured after the field's label.
    Found(String),
    /// Label missing or nothing usable after it.
    NotFound,
}

impl FieldValue {
    /// Build a value from a captured run, mapping blank captures to `NotFound`.
    pub fn from_capture(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::NotFound
        } else {
            Self::Found(trimmed.to_string())
        }
    }

    /// Captured text, if any.
    pub fn found(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The string carried on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(value) => value,
            Self::NotFound => NOT_FOUND,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        if value == NOT_FOUND {
            Self::NotFound
        } else {
            Self::Found(value)
        }
    }
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Found(value) => value,
            FieldValue::NotFound => NOT_FOUND.to_string(),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to value mapping produced for one document.
///
/// Results built by the field engine always carry one entry per catalog
/// field. Results decoded from elsewhere can be checked with
/// [`ExtractionResult::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: BTreeMap<String, FieldValue>,
}

impl ExtractionResult {
    pub(crate) fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Value of a field by catalog name.
    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.fields.get(field_name)
    }

    /// Wire string of a field, or the sentinel when the key is absent.
    pub fn value(&self, field_name: &str) -> &str {
        self.get(field_name).map_or(NOT_FOUND, FieldValue::as_str)
    }

    /// Fields in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> + '_ {
        CATALOG
            .iter()
            .filter_map(|spec| self.fields.get(spec.field_name).map(|v| (spec.field_name, v)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields that carry a captured value.
    pub fn found_count(&self) -> usize {
        self.fields.values().filter(|v| v.is_found()).count()
    }

    /// Whether the key set equals the catalog's field names.
    pub fn is_complete(&self) -> bool {
        self.fields.len() == CATALOG.len()
            && CATALOG.iter().all(|spec| self.fields.contains_key(spec.field_name))
    }

    /// Settlement number, the record's natural key.
    pub fn radicado(&self) -> Option<&str> {
        self.get("RADICADO").and_then(FieldValue::found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_capture_is_not_found() {
        assert_eq!(FieldValue::from_capture("   "), FieldValue::NotFound);
        assert_eq!(
            FieldValue::from_capture("  12345 "),
            FieldValue::Found("12345".to_string())
        );
    }

    #[test]
    fn test_sentinel_serializes_as_marker() {
        let json = serde_json::to_string(&FieldValue::NotFound).unwrap();
        assert_eq!(json, format!("\"{NOT_FOUND}\""));

        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FieldValue::NotFound);
    }

    #[test]
    fn test_partial_map_is_incomplete() {
        let result: ExtractionResult =
            serde_json::from_str(r#"{"RADICADO": "12345"}"#).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.radicado(), Some("12345"));
        assert_eq!(result.value("CLASE"), NOT_FOUND);
    }
}
