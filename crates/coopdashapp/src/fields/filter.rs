//! Field filtering.
//!
//! `FieldFilter` keeps records whose named field is one of a set of values. It
//! compares the field's canonical string form (see [`FieldValue::render`]), so
//! the same filter works for text, category, numeric and date fields alike.
//!
//! [`FieldValue::render`]: super::FieldValue::render

use crate::model::Record;

/// Set-membership condition on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// The field name (e.g., "action", "quality")
    pub field: String,
    /// Accepted rendered values. An empty set matches nothing.
    pub values: Vec<String>,
}

impl FieldFilter {
    pub fn one_of(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            values,
        }
    }

    /// Check if this filter matches the given record.
    ///
    /// Returns `false` if the field doesn't exist on the record or is unset.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(value) = record.get_field(&self.field) else {
            return false;
        };
        let rendered = value.render();
        self.values.iter().any(|v| *v == rendered)
    }
}
