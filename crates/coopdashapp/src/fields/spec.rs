//! Per-kind field tables.
//!
//! Each record kind declares its fields once, here: the name used by callers,
//! the kind of value it holds, and which roles it plays (identifier, timestamp,
//! classification, ...). Search, filtering and aggregation look fields up
//! through these tables instead of knowing any record shape.

use crate::model::RecordKind;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Timestamp,
    Category,
    /// Key/value map; excluded from "all fields" search
    Nested,
}

impl FieldKind {
    pub const fn is_scalar(self) -> bool {
        !matches!(self, FieldKind::Nested)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Category => "category",
            FieldKind::Nested => "nested",
        }
    }
}

/// A role a field can play for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Stable record identifier
    Identifier,
    /// Field the date-range filter applies to
    Timestamp,
    /// Raw status/quality/risk value fed to the classifier
    Classification,
    /// Default field for the category filter and the "most common" card
    Category,
    /// Who the record is about or who performed it
    Actor,
    /// What the record touches (resource, centre, product)
    Subject,
}

impl FieldRole {
    pub const ALL: [FieldRole; 6] = [
        FieldRole::Identifier,
        FieldRole::Timestamp,
        FieldRole::Classification,
        FieldRole::Category,
        FieldRole::Actor,
        FieldRole::Subject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldRole::Identifier => "identifier",
            FieldRole::Timestamp => "timestamp",
            FieldRole::Classification => "classification",
            FieldRole::Category => "category",
            FieldRole::Actor => "actor",
            FieldRole::Subject => "subject",
        }
    }
}

/// Specification for a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name used in the API (e.g. "action", "farmer_name")
    pub name: &'static str,

    /// The kind of value this field holds
    pub kind: FieldKind,

    pub identifier: bool,
    pub timestamp: bool,
    pub classification: bool,
    pub category: bool,
    pub actor: bool,
    pub subject: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            identifier: false,
            timestamp: false,
            classification: false,
            category: false,
            actor: false,
            subject: false,
        }
    }

    const fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }

    const fn timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    const fn classification(mut self) -> Self {
        self.classification = true;
        self
    }

    const fn category(mut self) -> Self {
        self.category = true;
        self
    }

    const fn actor(mut self) -> Self {
        self.actor = true;
        self
    }

    const fn subject(mut self) -> Self {
        self.subject = true;
        self
    }

    /// Whether this field plays the given role.
    pub fn has_role(&self, role: FieldRole) -> bool {
        match role {
            FieldRole::Identifier => self.identifier,
            FieldRole::Timestamp => self.timestamp,
            FieldRole::Classification => self.classification,
            FieldRole::Category => self.category,
            FieldRole::Actor => self.actor,
            FieldRole::Subject => self.subject,
        }
    }

    /// Every role this field plays, in [`FieldRole::ALL`] order.
    pub fn roles(&self) -> impl Iterator<Item = FieldRole> + '_ {
        FieldRole::ALL
            .into_iter()
            .filter(move |role| self.has_role(*role))
    }
}

pub const AUDIT_EVENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldKind::Text).identifier(),
    FieldSpec::new("timestamp", FieldKind::Timestamp).timestamp(),
    FieldSpec::new("user", FieldKind::Text).actor(),
    FieldSpec::new("user_role", FieldKind::Category),
    FieldSpec::new("action", FieldKind::Category)
        .classification()
        .category(),
    FieldSpec::new("resource", FieldKind::Category).subject(),
    FieldSpec::new("resource_id", FieldKind::Text),
    FieldSpec::new("details", FieldKind::Text),
    FieldSpec::new("ip_address", FieldKind::Text),
    FieldSpec::new("metadata", FieldKind::Nested),
];

pub const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldKind::Text).identifier(),
    FieldSpec::new("name", FieldKind::Text).actor(),
    FieldSpec::new("email", FieldKind::Text),
    FieldSpec::new("phone", FieldKind::Text),
    FieldSpec::new("role", FieldKind::Category).category(),
    FieldSpec::new("status", FieldKind::Category).classification(),
    FieldSpec::new("location", FieldKind::Text).subject(),
    FieldSpec::new("joined_on", FieldKind::Date).timestamp(),
];

pub const MILK_ENTRY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldKind::Text).identifier(),
    FieldSpec::new("farmer_id", FieldKind::Text),
    FieldSpec::new("farmer_name", FieldKind::Text).actor(),
    FieldSpec::new("collected_on", FieldKind::Date).timestamp(),
    FieldSpec::new("session", FieldKind::Category),
    FieldSpec::new("quantity_litres", FieldKind::Number),
    FieldSpec::new("fat_content", FieldKind::Number),
    FieldSpec::new("quality", FieldKind::Category)
        .classification()
        .category(),
    FieldSpec::new("collection_center", FieldKind::Text).subject(),
    FieldSpec::new("recorded_by", FieldKind::Text),
];

pub const LOAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldKind::Text).identifier(),
    FieldSpec::new("member_id", FieldKind::Text),
    FieldSpec::new("member_name", FieldKind::Text).actor(),
    FieldSpec::new("loan_type", FieldKind::Category)
        .category()
        .subject(),
    FieldSpec::new("principal", FieldKind::Number),
    FieldSpec::new("balance", FieldKind::Number),
    FieldSpec::new("interest_rate", FieldKind::Number),
    FieldSpec::new("issued_on", FieldKind::Date).timestamp(),
    FieldSpec::new("due_on", FieldKind::Date),
    FieldSpec::new("status", FieldKind::Category).classification(),
];

pub const SAVINGS_ACCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", FieldKind::Text).identifier(),
    FieldSpec::new("member_id", FieldKind::Text),
    FieldSpec::new("member_name", FieldKind::Text).actor(),
    FieldSpec::new("account_type", FieldKind::Category)
        .category()
        .subject(),
    FieldSpec::new("balance", FieldKind::Number),
    FieldSpec::new("opened_on", FieldKind::Date).timestamp(),
    FieldSpec::new("last_transaction_on", FieldKind::Date),
    FieldSpec::new("status", FieldKind::Category).classification(),
];

/// Field table for a record kind.
pub fn fields_of(kind: RecordKind) -> &'static [FieldSpec] {
    match kind {
        RecordKind::AuditEvent => AUDIT_EVENT_FIELDS,
        RecordKind::User => USER_FIELDS,
        RecordKind::MilkEntry => MILK_ENTRY_FIELDS,
        RecordKind::Loan => LOAN_FIELDS,
        RecordKind::SavingsAccount => SAVINGS_ACCOUNT_FIELDS,
    }
}

/// Look up a field spec by kind and name.
pub fn get_spec(kind: RecordKind, name: &str) -> Option<&'static FieldSpec> {
    fields_of(kind).iter().find(|spec| spec.name == name)
}

/// Name of the first field playing `role` for this kind.
pub fn field_with_role(kind: RecordKind, role: FieldRole) -> Option<&'static str> {
    fields_of(kind)
        .iter()
        .find(|spec| spec.has_role(role))
        .map(|spec| spec.name)
}

/// Names of the fields that take part in "all fields" search.
pub fn scalar_fields(kind: RecordKind) -> impl Iterator<Item = &'static str> {
    fields_of(kind)
        .iter()
        .filter(|spec| spec.kind.is_scalar())
        .map(|spec| spec.name)
}
