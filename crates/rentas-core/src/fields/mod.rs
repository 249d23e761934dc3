//! Field extraction for settlement forms.
//!
//! A static [`CATALOG`] binds each output field to the label printed before
//! it on the form and to a value policy. [`FieldEngine`] applies the catalog
//! to a text blob and always yields one entry per field.

mod catalog;
mod engine;
pub mod rules;

pub use catalog::{field_spec, FieldSpec, ValuePolicy, CATALOG};
pub use engine::FieldEngine;
pub use rules::ExtractionMatch;
