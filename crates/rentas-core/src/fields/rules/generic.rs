//! Free-text values terminated by layout whitespace.

use super::patterns::GENERIC_VALUE;
use super::{ExtractionMatch, ValueRule};

/// Captures up to a double space, a newline or the end of text.
pub struct GenericRule;

impl ValueRule for GenericRule {
    fn capture(&self, after_label: &str) -> Option<ExtractionMatch> {
        let group = GENERIC_VALUE.captures(after_label)?.get(1)?;

        let raw = group.as_str();
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        let start = group.start() + (raw.len() - raw.trim_start().len());
        Some(ExtractionMatch::new(value, start, start + value.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_after_colon() {
        let m = GenericRule.capture(": 12345    \n").unwrap();
        assert_eq!(m.value, "12345");
        assert_eq!(m.start, 2);
        assert_eq!(m.end, 7);
    }

    #[test]
    fn test_single_spaces_stay_in_value() {
        let m = GenericRule.capture(" NOTARIA 15 DE BOGOTA  NIT 1234").unwrap();
        assert_eq!(m.value, "NOTARIA 15 DE BOGOTA");
    }

    #[test]
    fn test_value_runs_to_end_of_text() {
        let m = GenericRule.capture(": COMPRAVENTA").unwrap();
        assert_eq!(m.value, "COMPRAVENTA");
    }

    #[test]
    fn test_value_stops_at_newline() {
        let m = GenericRule.capture(": BOGOTA D.C.\nFECHA LIQ: 01.02.2024").unwrap();
        assert_eq!(m.value, "BOGOTA D.C.");
    }

    #[test]
    fn test_nothing_after_label() {
        assert!(GenericRule.capture("").is_none());
        assert!(GenericRule.capture(":   ").is_none());
    }
}
