//! Summary statistics over a record set.
//!
//! The stat cards above each table ("Total events", "Most common action",
//! "Most active user", "Most accessed resource") are all counts over the rows
//! currently in view. [`summarize`] groups by any key function into a
//! [`Tally`]; [`compute`] builds the standard [`AggregateStats`] for the
//! dashboard.
//!
//! Records without a key are counted under [`UNKNOWN_KEY`], so a tally always
//! sums to the number of records it was built from. Tallies keep keys in the
//! order they were first seen; [`Tally::top`] breaks ties in favour of the
//! earliest key.

use indexmap::IndexMap;
use serde::Serialize;

use crate::classify::RuleBook;
use crate::fields::FieldRole;
use crate::model::Record;

/// Key used for records with no value for the grouping key.
pub const UNKNOWN_KEY: &str = "unknown";

/// Insertion-ordered key counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally {
    counts: IndexMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    pub fn add(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, n)| (k.as_str(), *n))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Key with the highest count; the first-seen key wins a tie.
    pub fn top(&self) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in self.iter() {
            if best.map_or(true, |(_, n)| count > n) {
                best = Some((key, count));
            }
        }
        best
    }
}

/// Group `records` by `key_fn` and count each group.
///
/// `None` and blank keys are counted under [`UNKNOWN_KEY`].
pub fn summarize<T, K, F>(records: &[T], mut key_fn: F) -> Tally
where
    F: FnMut(&T) -> Option<K>,
    K: Into<String>,
{
    let mut tally = Tally::new();
    for record in records {
        let key = key_fn(record)
            .map(Into::into)
            .filter(|k: &String| !k.trim().is_empty());
        tally.add(key.unwrap_or_else(|| UNKNOWN_KEY.to_string()));
    }
    tally
}

/// Most frequent key, if any.
pub fn top_key(tally: &Tally) -> Option<&str> {
    tally.top().map(|(key, _)| key)
}

/// The standard dashboard statistics for a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateStats {
    pub total: usize,
    pub by_classification: Tally,
    pub by_category: Tally,
    pub by_actor: Tally,
    pub by_subject: Tally,
    pub top_category: Option<String>,
    pub top_actor: Option<String>,
    pub top_subject: Option<String>,
}

impl AggregateStats {
    pub fn empty() -> Self {
        compute::<&Record>(&[], &RuleBook::default())
    }
}

/// Compute [`AggregateStats`] over `records` in a single pass per tally.
pub fn compute<R: AsRef<Record>>(records: &[R], rules: &RuleBook) -> AggregateStats {
    let by_classification = summarize(records, |r| Some(rules.classify(r.as_ref()).as_str()));
    let by_category = summarize(records, |r| role_key(r.as_ref(), FieldRole::Category));
    let by_actor = summarize(records, |r| role_key(r.as_ref(), FieldRole::Actor));
    let by_subject = summarize(records, |r| role_key(r.as_ref(), FieldRole::Subject));

    let unknown = by_classification.get(UNKNOWN_KEY);
    if unknown > 0 {
        tracing::debug!(unknown, "records with unrecognised classification values");
    }

    AggregateStats {
        total: records.len(),
        top_category: top_key(&by_category).map(str::to_string),
        top_actor: top_key(&by_actor).map(str::to_string),
        top_subject: top_key(&by_subject).map(str::to_string),
        by_classification,
        by_category,
        by_actor,
        by_subject,
    }
}

fn role_key(record: &Record, role: FieldRole) -> Option<String> {
    record.field_with_role(role).map(|v| v.render())
}
