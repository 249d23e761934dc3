//! Value rules applied to the text that follows a field label.

pub mod dates;
pub mod generic;
pub mod patterns;

pub use dates::DottedDateRule;
pub use generic::GenericRule;
pub use patterns::label_pattern;

use super::catalog::ValuePolicy;

/// Trait for value rules.
pub trait ValueRule: Send + Sync {
    /// Capture a value from the text immediately after a label.
    ///
    /// Positions in the returned match are relative to `after_label`.
    fn capture(&self, after_label: &str) -> Option<ExtractionMatch>;
}

/// A captured value and where it sits in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch {
    /// Trimmed captured value, never empty.
    pub value: String,
    /// Byte offset of the value's first character.
    pub start: usize,
    /// Byte offset one past the value's last character.
    pub end: usize,
}

impl ExtractionMatch {
    pub fn new(value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value: value.into(),
            start,
            end,
        }
    }

    /// Shift positions by `by` bytes.
    pub fn offset(mut self, by: usize) -> Self {
        self.start += by;
        self.end += by;
        self
    }
}

/// The rule implementing a catalog policy.
pub fn rule_for(policy: ValuePolicy) -> &'static dyn ValueRule {
    match policy {
        ValuePolicy::Generic => &GenericRule,
        ValuePolicy::DateDdMmYyyy => &DottedDateRule,
    }
}
