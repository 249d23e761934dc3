//! Regex patterns for label-driven field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Value after a label: optional colon/whitespace separator, then a run
    // ending at 2+ whitespace, a newline or end of text.
    pub static ref GENERIC_VALUE: Regex = Regex::new(
        r"\A[:\s]*(.*?)(?:\s{2,}|\n|\z)"
    ).unwrap();

    // Registration deadline: dd.dd.dddd immediately after the separator.
    pub static ref DOTTED_DATE_VALUE: Regex = Regex::new(
        r"\A[:\s]*(\d{2}\.\d{2}\.\d{4})\b"
    ).unwrap();
}

/// Case-insensitive literal matcher for a label.
pub fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!("(?i){}", regex::escape(label)))
        .expect("escaped label is a valid pattern")
}
