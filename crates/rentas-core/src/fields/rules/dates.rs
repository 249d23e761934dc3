//! Fixed-shape date values.

use super::patterns::DOTTED_DATE_VALUE;
use super::{ExtractionMatch, ValueRule};

/// Accepts only `dd.dd.dddd` directly after the label.
///
/// The shape is checked, not the calendar: `31.02.2024` is captured as-is.
pub struct DottedDateRule;

impl ValueRule for DottedDateRule {
    fn capture(&self, after_label: &str) -> Option<ExtractionMatch> {
        let group = DOTTED_DATE_VALUE.captures(after_label)?.get(1)?;
        Some(ExtractionMatch::new(group.as_str(), group.start(), group.end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_dmy() {
        let m = DottedDateRule.capture(" 05.08.2024   VALOR").unwrap();
        assert_eq!(m.value, "05.08.2024");
        assert_eq!(m.start, 1);
    }

    #[test]
    fn test_rejects_words_after_label() {
        assert!(DottedDateRule.capture(" pendiente").is_none());
    }

    #[test]
    fn test_rejects_date_that_is_not_adjacent() {
        assert!(DottedDateRule.capture(" hasta el 05.08.2024").is_none());
    }

    #[test]
    fn test_rejects_other_separators() {
        assert!(DottedDateRule.capture(": 05/08/2024").is_none());
        assert!(DottedDateRule.capture(": 2024.08.05").is_none());
    }
}
