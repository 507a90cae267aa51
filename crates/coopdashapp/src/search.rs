//! Free-text search over records.
//!
//! The query is trimmed and lower-cased once when the matcher is built; each
//! record is then tested field by field, stopping at the first field whose
//! rendered value contains the query. With no explicit field list every scalar
//! field of the record's kind is a candidate; nested fields only take part when
//! named.

use serde::{Deserialize, Serialize};

use crate::error::{CoopdashError, Result};
use crate::fields::{get_spec, scalar_fields};
use crate::model::{Record, RecordKind};

/// What the user typed into the search box, plus an optional field scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub text: String,
    /// Restrict matching to these fields. `None` means all scalar fields.
    #[serde(default)]
    pub fields: Option<Vec<String>>,
}

impl SearchCriteria {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: None,
        }
    }

    pub fn in_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Empty or whitespace-only text matches everything.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Reject field scopes that could never match.
    ///
    /// Every named field must exist on `kind`, or on some kind when the scope
    /// is all kinds. An empty list and blank names are errors too.
    pub fn validate(&self, kind: Option<RecordKind>) -> Result<()> {
        let Some(fields) = &self.fields else {
            return Ok(());
        };
        if fields.is_empty() {
            return Err(CoopdashError::InvalidCriteria(
                "search field list is empty".to_string(),
            ));
        }
        for name in fields {
            if name.trim().is_empty() {
                return Err(CoopdashError::InvalidCriteria(
                    "blank search field name".to_string(),
                ));
            }
            let known = match kind {
                Some(kind) => get_spec(kind, name).is_some(),
                None => RecordKind::ALL.iter().any(|&k| get_spec(k, name).is_some()),
            };
            if !known {
                let scope = kind.map_or_else(|| "any record kind".to_string(), |k| k.to_string());
                return Err(CoopdashError::InvalidCriteria(format!(
                    "unknown search field '{}' for {}",
                    name, scope
                )));
            }
        }
        Ok(())
    }
}

/// A normalized query, ready to test records against.
#[derive(Debug, Clone)]
pub struct FieldMatcher<'c> {
    needle: String,
    fields: Option<&'c [String]>,
}

impl<'c> FieldMatcher<'c> {
    pub fn new(criteria: &'c SearchCriteria) -> Self {
        Self::from_parts(&criteria.text, criteria.fields.as_deref())
    }

    pub fn from_parts(query: &str, fields: Option<&'c [String]>) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
            fields,
        }
    }

    /// True when the query is empty and every record matches.
    pub fn matches_everything(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        match self.fields {
            Some(fields) => fields
                .iter()
                .any(|name| self.field_contains(record, name)),
            None => scalar_fields(record.kind()).any(|name| self.field_contains(record, name)),
        }
    }

    /// Keep the matching records, preserving order.
    pub fn apply<'a>(&self, records: Vec<&'a Record>) -> Vec<&'a Record> {
        if self.needle.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    fn field_contains(&self, record: &Record, name: &str) -> bool {
        record
            .get_field(name)
            .is_some_and(|value| value.render().to_lowercase().contains(&self.needle))
    }
}

/// One-shot form of [`FieldMatcher::matches`].
pub fn matches(record: &Record, query: &str, fields: Option<&[String]>) -> bool {
    FieldMatcher::from_parts(query, fields).matches(record)
}
