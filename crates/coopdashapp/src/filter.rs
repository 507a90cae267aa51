//! # Structured Filters
//!
//! The dashboard's filter bar offers three independent controls: a category
//! dropdown (action, quality, loan type, ...), a date range, and a status
//! bucket. [`FilterCriteria`] carries whichever of them are set; [`build`]
//! turns the set ones into a [`Predicate`] and [`apply`] runs it.
//!
//! ## Composition
//!
//! Each present constraint contributes one conjunct. Absent constraints, and
//! constraints with nothing in them (an empty value list, a date range with
//! both ends open), contribute nothing. A criteria with nothing set therefore
//! builds the identity predicate, and `apply` returns its input untouched.
//!
//! ## Matching Rules
//!
//! - **Category**: exact match of the field's rendered value against any of the
//!   listed values. The field defaults to the kind's category field (the
//!   audit action, the milk quality, the loan type).
//! - **Date range**: inclusive on both ends, compared on the calendar date of
//!   the kind's timestamp field. A record with no timestamp never matches.
//! - **Classification**: the record's bucket (see [`crate::classify`]) is one
//!   of the listed categories.
//!
//! `apply` makes a single pass, evaluates every conjunct at most once per
//! record, and keeps the input order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::{Category, RuleBook};
use crate::fields::{field_with_role, FieldFilter, FieldRole};
use crate::model::Record;

/// Inclusive date bounds; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn since(start: NaiveDate) -> Self {
        Self::new(Some(start), None)
    }

    pub fn until(end: NaiveDate) -> Self {
        Self::new(None, Some(end))
    }

    /// Both ends open: restricts nothing.
    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }
}

/// Category constraint: a field and the values it may take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    /// Field to match. `None` uses the record kind's category field.
    #[serde(default)]
    pub field: Option<String>,
    pub values: Vec<String>,
}

impl CategoryFilter {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn in_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// The filter bar state. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub category: Option<CategoryFilter>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub classification: Option<Vec<Category>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on the kind's category field.
    pub fn with_category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(CategoryFilter::new([value.into()]));
        self
    }

    pub fn with_category_filter(mut self, filter: CategoryFilter) -> Self {
        self.category = Some(filter);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_classification(mut self, category: Category) -> Self {
        self.classification
            .get_or_insert_with(Vec::new)
            .push(category);
        self
    }

    pub fn with_classifications<I: IntoIterator<Item = Category>>(mut self, categories: I) -> Self {
        self.classification
            .get_or_insert_with(Vec::new)
            .extend(categories);
        self
    }

    /// Nothing set that would restrict a result.
    pub fn is_empty(&self) -> bool {
        build(self, &RuleBook::default()).is_identity()
    }
}

/// A single conjunct of a [`Predicate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Category match on an explicit field.
    Field(FieldFilter),
    /// Category match on each record's own category field.
    KindCategory(Vec<String>),
    DateRange(DateRange),
    Classification(Vec<Category>),
}

impl Constraint {
    fn test(&self, record: &Record, rules: &RuleBook) -> bool {
        match self {
            Constraint::Field(filter) => filter.matches(record),
            Constraint::KindCategory(values) => {
                field_with_role(record.kind(), FieldRole::Category)
                    .and_then(|field| record.get_field(field))
                    .is_some_and(|value| values.contains(&value.render()))
            }
            Constraint::DateRange(range) => record.date().is_some_and(|d| range.contains(d)),
            Constraint::Classification(categories) => categories.contains(&rules.classify(record)),
        }
    }
}

/// Conjunction of the constraints built from a [`FilterCriteria`].
#[derive(Debug, Clone)]
pub struct Predicate<'r> {
    conjuncts: Vec<Constraint>,
    rules: &'r RuleBook,
}

impl<'r> Predicate<'r> {
    /// The predicate that matches every record.
    pub fn identity(rules: &'r RuleBook) -> Self {
        Self {
            conjuncts: Vec::new(),
            rules,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.conjuncts.is_empty()
    }

    pub fn conjuncts(&self) -> &[Constraint] {
        &self.conjuncts
    }

    pub fn test(&self, record: &Record) -> bool {
        self.conjuncts.iter().all(|c| c.test(record, self.rules))
    }
}

/// Build the combined predicate for `criteria`.
pub fn build<'r>(criteria: &FilterCriteria, rules: &'r RuleBook) -> Predicate<'r> {
    let mut predicate = Predicate::identity(rules);

    if let Some(category) = &criteria.category {
        if !category.values.is_empty() {
            predicate.conjuncts.push(match &category.field {
                Some(field) => {
                    Constraint::Field(FieldFilter::one_of(field.clone(), category.values.clone()))
                }
                None => Constraint::KindCategory(category.values.clone()),
            });
        }
    }

    if let Some(range) = criteria.date_range {
        if !range.is_open() {
            predicate.conjuncts.push(Constraint::DateRange(range));
        }
    }

    if let Some(categories) = &criteria.classification {
        if !categories.is_empty() {
            predicate
                .conjuncts
                .push(Constraint::Classification(categories.clone()));
        }
    }

    predicate
}

/// Keep the records the predicate accepts, in their original order.
pub fn apply<'a, I>(records: I, predicate: &Predicate<'_>) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().filter(|r| predicate.test(r)).collect()
}
