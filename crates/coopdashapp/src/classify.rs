//! # Status Classification
//!
//! Every record kind has one field whose raw value drives the coloured badge in
//! the tables: the audit action, the user status, the milk quality grade, the
//! loan or account status. The dashboard also filters on the same buckets
//! ("show me everything in trouble"), so the mapping lives in exactly one place.
//!
//! ## Categories
//!
//! The set is closed: [`Category::Success`], [`Category::Info`],
//! [`Category::Warning`], [`Category::Danger`] plus the reserved
//! [`Category::Unknown`] for values no rule mentions.
//!
//! ## Rules
//!
//! A [`ClassificationRule`] is a static lookup table. Raw values are compared
//! after trimming, ignoring ASCII case, so `"overdue"` and `"Overdue "` land in
//! the same bucket. A value missing from the table is `Unknown`; classification
//! never fails.
//!
//! | Rule | success | info | warning | danger |
//! |------|---------|------|---------|--------|
//! | audit action | CREATE, APPROVE | UPDATE, VIEW, LOGIN, LOGOUT | EXPORT | DELETE, REJECT |
//! | user status | Active | Inactive | Pending | Suspended |
//! | milk quality | Grade A | Grade B | Grade C | Rejected |
//! | loan status | Current | Repaid, Pending | Due Soon | Overdue, Defaulted |
//! | savings status | Active | Closed | Dormant | Frozen |
//!
//! [`RuleBook`] holds one rule per record kind. Callers can swap a rule for a
//! kind before running queries; filtering and aggregation both read from the
//! same book, so they cannot disagree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoopdashError;
use crate::model::{Record, RecordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Info,
    Warning,
    Danger,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Success,
        Category::Info,
        Category::Warning,
        Category::Danger,
        Category::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Info => "info",
            Category::Warning => "warning",
            Category::Danger => "danger",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoopdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoopdashError::InvalidCriteria(format!(
                    "unknown classification \"{}\" (expected success, info, warning, danger or unknown)",
                    wanted
                ))
            })
    }
}

/// Static lookup table from raw values to categories.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassificationRule {
    pub name: &'static str,
    entries: &'static [(&'static str, Category)],
}

impl ClassificationRule {
    pub const fn new(name: &'static str, entries: &'static [(&'static str, Category)]) -> Self {
        Self { name, entries }
    }

    /// Bucket for a raw value. Unlisted values are [`Category::Unknown`].
    pub fn classify(&self, raw: &str) -> Category {
        let raw = raw.trim();
        self.entries
            .iter()
            .find(|(value, _)| value.eq_ignore_ascii_case(raw))
            .map(|(_, category)| *category)
            .unwrap_or(Category::Unknown)
    }

    pub fn entries(&self) -> &'static [(&'static str, Category)] {
        self.entries
    }

    /// Raw values that land in `category`, in table order.
    pub fn values_for(&self, category: Category) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(move |(_, c)| *c == category)
            .map(|(value, _)| *value)
    }
}

pub static AUDIT_ACTION_RULE: ClassificationRule = ClassificationRule::new(
    "audit_action",
    &[
        ("CREATE", Category::Success),
        ("APPROVE", Category::Success),
        ("UPDATE", Category::Info),
        ("VIEW", Category::Info),
        ("LOGIN", Category::Info),
        ("LOGOUT", Category::Info),
        ("EXPORT", Category::Warning),
        ("DELETE", Category::Danger),
        ("REJECT", Category::Danger),
    ],
);

pub static USER_STATUS_RULE: ClassificationRule = ClassificationRule::new(
    "user_status",
    &[
        ("Active", Category::Success),
        ("Inactive", Category::Info),
        ("Pending", Category::Warning),
        ("Suspended", Category::Danger),
    ],
);

pub static MILK_QUALITY_RULE: ClassificationRule = ClassificationRule::new(
    "milk_quality",
    &[
        ("Grade A", Category::Success),
        ("Grade B", Category::Info),
        ("Grade C", Category::Warning),
        ("Rejected", Category::Danger),
    ],
);

pub static LOAN_STATUS_RULE: ClassificationRule = ClassificationRule::new(
    "loan_status",
    &[
        ("Current", Category::Success),
        ("Repaid", Category::Info),
        ("Pending", Category::Info),
        ("Due Soon", Category::Warning),
        ("Overdue", Category::Danger),
        ("Defaulted", Category::Danger),
    ],
);

pub static SAVINGS_STATUS_RULE: ClassificationRule = ClassificationRule::new(
    "savings_status",
    &[
        ("Active", Category::Success),
        ("Closed", Category::Info),
        ("Dormant", Category::Warning),
        ("Frozen", Category::Danger),
    ],
);

/// Built-in rule for a record kind.
pub fn default_rule(kind: RecordKind) -> &'static ClassificationRule {
    match kind {
        RecordKind::AuditEvent => &AUDIT_ACTION_RULE,
        RecordKind::User => &USER_STATUS_RULE,
        RecordKind::MilkEntry => &MILK_QUALITY_RULE,
        RecordKind::Loan => &LOAN_STATUS_RULE,
        RecordKind::SavingsAccount => &SAVINGS_STATUS_RULE,
    }
}

/// Classifier bound to a single rule.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier<'r> {
    rule: &'r ClassificationRule,
}

impl<'r> StatusClassifier<'r> {
    pub fn new(rule: &'r ClassificationRule) -> Self {
        Self { rule }
    }

    pub fn classify(&self, raw: &str) -> Category {
        self.rule.classify(raw)
    }

    pub fn rule(&self) -> &'r ClassificationRule {
        self.rule
    }
}

/// One classification rule per record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleBook {
    rules: [&'static ClassificationRule; 5],
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            rules: RecordKind::ALL.map(default_rule),
        }
    }
}

impl RuleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule used for `kind`.
    pub fn with_rule(mut self, kind: RecordKind, rule: &'static ClassificationRule) -> Self {
        self.rules[slot(kind)] = rule;
        self
    }

    pub fn rule(&self, kind: RecordKind) -> &'static ClassificationRule {
        self.rules[slot(kind)]
    }

    pub fn classifier(&self, kind: RecordKind) -> StatusClassifier<'static> {
        StatusClassifier::new(self.rule(kind))
    }

    /// Bucket for a record. A record without a classification value is `Unknown`.
    pub fn classify(&self, record: &Record) -> Category {
        match record.classification_value() {
            Some(raw) => self.classifier(record.kind()).classify(&raw),
            None => Category::Unknown,
        }
    }
}

fn slot(kind: RecordKind) -> usize {
    match kind {
        RecordKind::AuditEvent => 0,
        RecordKind::User => 1,
        RecordKind::MilkEntry => 2,
        RecordKind::Loan => 3,
        RecordKind::SavingsAccount => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditEvent, Loan};
    use chrono::{TimeZone, Utc};

    #[test]
    fn audit_actions_map_to_expected_buckets() {
        let c = StatusClassifier::new(&AUDIT_ACTION_RULE);
        assert_eq!(c.classify("CREATE"), Category::Success);
        assert_eq!(c.classify("UPDATE"), Category::Info);
        assert_eq!(c.classify("EXPORT"), Category::Warning);
        assert_eq!(c.classify("DELETE"), Category::Danger);
    }

    #[test]
    fn classification_ignores_case_and_padding() {
        assert_eq!(LOAN_STATUS_RULE.classify(" overdue "), Category::Danger);
        assert_eq!(MILK_QUALITY_RULE.classify("GRADE A"), Category::Success);
    }

    #[test]
    fn unmapped_value_is_unknown() {
        assert_eq!(AUDIT_ACTION_RULE.classify("TELEPORT"), Category::Unknown);
        assert_eq!(USER_STATUS_RULE.classify(""), Category::Unknown);
    }

    #[test]
    fn rules_never_map_to_unknown_explicitly() {
        for kind in RecordKind::ALL {
            let rule = default_rule(kind);
            assert!(rule.values_for(Category::Unknown).next().is_none());
            assert!(!rule.entries().is_empty());
        }
    }

    #[test]
    fn values_for_lists_in_table_order() {
        let danger: Vec<_> = LOAN_STATUS_RULE.values_for(Category::Danger).collect();
        assert_eq!(danger, vec!["Overdue", "Defaulted"]);
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("Warning".parse::<Category>().unwrap(), Category::Warning);
        assert!("purple".parse::<Category>().is_err());
    }

    #[test]
    fn rule_book_classifies_records_by_kind() {
        let book = RuleBook::default();
        let event: Record = AuditEvent::new(
            "AUD009",
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap(),
            "Admin",
            "DELETE",
            "Member",
        )
        .into();
        let loan: Record = Loan::new("LN002", "Moses Kato", "Livestock", 2_000_000.0, "Overdue").into();

        assert_eq!(book.classify(&event), Category::Danger);
        assert_eq!(book.classify(&loan), Category::Danger);
    }

    static LENIENT_LOANS: ClassificationRule =
        ClassificationRule::new("lenient_loans", &[("Overdue", Category::Warning)]);

    #[test]
    fn rule_book_override_replaces_one_kind_only() {
        let book = RuleBook::default().with_rule(RecordKind::Loan, &LENIENT_LOANS);
        assert_eq!(book.rule(RecordKind::Loan).name, "lenient_loans");
        assert_eq!(book.rule(RecordKind::AuditEvent).name, "audit_action");

        let loan: Record = Loan::new("LN003", "Moses Kato", "Livestock", 1.0, "Overdue").into();
        assert_eq!(book.classify(&loan), Category::Warning);
    }
}
