//! # Domain Model: Dashboard Records
//!
//! The dashboard shows five kinds of records: audit events, users,
//! milk-collection entries, loans and savings accounts. Each kind is a plain
//! typed struct; [`Record`] is the closed tagged union over them.
//!
//! ## Field Access
//!
//! The engine never matches on record shapes. It asks a record for a field by
//! name ([`Record::get_field`]) or by role ([`Record::field_with_role`]) and
//! gets back a [`FieldValue`]. The names and roles come from the per-kind
//! tables in [`crate::fields`]; the `get_field` matches below are the only
//! place that knows how a name maps onto a struct member.
//!
//! Optional members that are unset (`phone`, `issued_on`, ...) come back as
//! `None`, which search and filtering treat as "does not match" rather than as
//! an error.
//!
//! ## Serialization
//!
//! Records are internally tagged on `kind`:
//!
//! ```text
//! { "kind": "milk_entry", "id": "MC001", "farmer_name": "John Mugisha", ... }
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoopdashError;
use crate::fields::{field_with_role, FieldRole, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    AuditEvent,
    User,
    MilkEntry,
    Loan,
    SavingsAccount,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::AuditEvent,
        RecordKind::User,
        RecordKind::MilkEntry,
        RecordKind::Loan,
        RecordKind::SavingsAccount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::AuditEvent => "audit_event",
            RecordKind::User => "user",
            RecordKind::MilkEntry => "milk_entry",
            RecordKind::Loan => "loan",
            RecordKind::SavingsAccount => "savings_account",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = CoopdashError;

    /// Accepts the serialized name plus the short forms the report tabs use.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "audit_event" | "audit" | "audit_log" => Ok(RecordKind::AuditEvent),
            "user" | "users" => Ok(RecordKind::User),
            "milk_entry" | "milk" | "milk_collection" => Ok(RecordKind::MilkEntry),
            "loan" | "loans" => Ok(RecordKind::Loan),
            "savings_account" | "savings" => Ok(RecordKind::SavingsAccount),
            other => Err(CoopdashError::InvalidCriteria(format!(
                "unknown record kind \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user: String,
    #[serde(default)]
    pub user_role: String,
    pub action: String,
    pub resource: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl AuditEvent {
    pub fn new(
        id: impl Into<String>,
        timestamp: DateTime<Utc>,
        user: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            user: user.into(),
            user_role: String::new(),
            action: action.into(),
            resource: resource.into(),
            resource_id: None,
            details: String::new(),
            ip_address: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "timestamp" => Some(FieldValue::Timestamp(self.timestamp)),
            "user" => Some(FieldValue::Text(self.user.clone())),
            "user_role" => Some(FieldValue::Category(self.user_role.clone())),
            "action" => Some(FieldValue::Category(self.action.clone())),
            "resource" => Some(FieldValue::Category(self.resource.clone())),
            "resource_id" => self.resource_id.clone().map(FieldValue::Text),
            "details" => Some(FieldValue::Text(self.details.clone())),
            "ip_address" => self.ip_address.clone().map(FieldValue::Text),
            "metadata" => Some(FieldValue::Nested(self.metadata.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    #[serde(default)]
    pub location: String,
    pub joined_on: NaiveDate,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        status: impl Into<String>,
        joined_on: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            phone: None,
            role: role.into(),
            status: status.into(),
            location: String::new(),
            joined_on,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "email" => Some(FieldValue::Text(self.email.clone())),
            "phone" => self.phone.clone().map(FieldValue::Text),
            "role" => Some(FieldValue::Category(self.role.clone())),
            "status" => Some(FieldValue::Category(self.status.clone())),
            "location" => Some(FieldValue::Text(self.location.clone())),
            "joined_on" => Some(FieldValue::Date(self.joined_on)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkEntry {
    pub id: String,
    pub farmer_id: String,
    pub farmer_name: String,
    pub collected_on: NaiveDate,
    #[serde(default)]
    pub session: String,
    pub quantity_litres: f64,
    #[serde(default)]
    pub fat_content: Option<f64>,
    pub quality: String,
    pub collection_center: String,
    #[serde(default)]
    pub recorded_by: String,
}

impl MilkEntry {
    pub fn new(
        id: impl Into<String>,
        farmer_name: impl Into<String>,
        collected_on: NaiveDate,
        quantity_litres: f64,
        quality: impl Into<String>,
        collection_center: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            farmer_id: String::new(),
            farmer_name: farmer_name.into(),
            collected_on,
            session: String::new(),
            quantity_litres,
            fat_content: None,
            quality: quality.into(),
            collection_center: collection_center.into(),
            recorded_by: String::new(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "farmer_id" => Some(FieldValue::Text(self.farmer_id.clone())),
            "farmer_name" => Some(FieldValue::Text(self.farmer_name.clone())),
            "collected_on" => Some(FieldValue::Date(self.collected_on)),
            "session" => Some(FieldValue::Category(self.session.clone())),
            "quantity_litres" => Some(FieldValue::Number(self.quantity_litres)),
            "fat_content" => self.fat_content.map(FieldValue::Number),
            "quality" => Some(FieldValue::Category(self.quality.clone())),
            "collection_center" => Some(FieldValue::Text(self.collection_center.clone())),
            "recorded_by" => Some(FieldValue::Text(self.recorded_by.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub loan_type: String,
    pub principal: f64,
    pub balance: f64,
    #[serde(default)]
    pub interest_rate: f64,
    /// Unset while the application has not been disbursed.
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    pub status: String,
}

impl Loan {
    pub fn new(
        id: impl Into<String>,
        member_name: impl Into<String>,
        loan_type: impl Into<String>,
        principal: f64,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            member_id: String::new(),
            member_name: member_name.into(),
            loan_type: loan_type.into(),
            principal,
            balance: principal,
            interest_rate: 0.0,
            issued_on: None,
            due_on: None,
            status: status.into(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "member_id" => Some(FieldValue::Text(self.member_id.clone())),
            "member_name" => Some(FieldValue::Text(self.member_name.clone())),
            "loan_type" => Some(FieldValue::Category(self.loan_type.clone())),
            "principal" => Some(FieldValue::Number(self.principal)),
            "balance" => Some(FieldValue::Number(self.balance)),
            "interest_rate" => Some(FieldValue::Number(self.interest_rate)),
            "issued_on" => self.issued_on.map(FieldValue::Date),
            "due_on" => self.due_on.map(FieldValue::Date),
            "status" => Some(FieldValue::Category(self.status.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsAccount {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub account_type: String,
    pub balance: f64,
    pub opened_on: NaiveDate,
    #[serde(default)]
    pub last_transaction_on: Option<NaiveDate>,
    pub status: String,
}

impl SavingsAccount {
    pub fn new(
        id: impl Into<String>,
        member_name: impl Into<String>,
        account_type: impl Into<String>,
        balance: f64,
        opened_on: NaiveDate,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            member_id: String::new(),
            member_name: member_name.into(),
            account_type: account_type.into(),
            balance,
            opened_on,
            last_transaction_on: None,
            status: status.into(),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.id.clone())),
            "member_id" => Some(FieldValue::Text(self.member_id.clone())),
            "member_name" => Some(FieldValue::Text(self.member_name.clone())),
            "account_type" => Some(FieldValue::Category(self.account_type.clone())),
            "balance" => Some(FieldValue::Number(self.balance)),
            "opened_on" => Some(FieldValue::Date(self.opened_on)),
            "last_transaction_on" => self.last_transaction_on.map(FieldValue::Date),
            "status" => Some(FieldValue::Category(self.status.clone())),
            _ => None,
        }
    }
}

/// One dashboard record of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    AuditEvent(AuditEvent),
    User(User),
    MilkEntry(MilkEntry),
    Loan(Loan),
    SavingsAccount(SavingsAccount),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::AuditEvent(_) => RecordKind::AuditEvent,
            Record::User(_) => RecordKind::User,
            Record::MilkEntry(_) => RecordKind::MilkEntry,
            Record::Loan(_) => RecordKind::Loan,
            Record::SavingsAccount(_) => RecordKind::SavingsAccount,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Record::AuditEvent(r) => &r.id,
            Record::User(r) => &r.id,
            Record::MilkEntry(r) => &r.id,
            Record::Loan(r) => &r.id,
            Record::SavingsAccount(r) => &r.id,
        }
    }

    /// Get a field value by name.
    ///
    /// Returns `None` for names the kind does not declare and for optional
    /// fields that are unset.
    pub fn get_field(&self, name: &str) -> Option<FieldValue> {
        match self {
            Record::AuditEvent(r) => r.get_field(name),
            Record::User(r) => r.get_field(name),
            Record::MilkEntry(r) => r.get_field(name),
            Record::Loan(r) => r.get_field(name),
            Record::SavingsAccount(r) => r.get_field(name),
        }
    }

    /// Value of the field playing `role` for this record's kind.
    pub fn field_with_role(&self, role: FieldRole) -> Option<FieldValue> {
        field_with_role(self.kind(), role).and_then(|name| self.get_field(name))
    }

    /// Calendar date of the designated timestamp field.
    pub fn date(&self) -> Option<NaiveDate> {
        self.field_with_role(FieldRole::Timestamp)
            .and_then(|v| v.as_date())
    }

    /// Raw status/quality/risk value, before classification.
    pub fn classification_value(&self) -> Option<String> {
        self.field_with_role(FieldRole::Classification)
            .map(|v| v.render())
    }
}

impl AsRef<Record> for Record {
    fn as_ref(&self) -> &Record {
        self
    }
}

impl From<AuditEvent> for Record {
    fn from(r: AuditEvent) -> Self {
        Record::AuditEvent(r)
    }
}

impl From<User> for Record {
    fn from(r: User) -> Self {
        Record::User(r)
    }
}

impl From<MilkEntry> for Record {
    fn from(r: MilkEntry) -> Self {
        Record::MilkEntry(r)
    }
}

impl From<Loan> for Record {
    fn from(r: Loan) -> Self {
        Record::Loan(r)
    }
}

impl From<SavingsAccount> for Record {
    fn from(r: SavingsAccount) -> Self {
        Record::SavingsAccount(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{fields_of, FieldKind};
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_of(kind: RecordKind) -> Record {
        match kind {
            RecordKind::AuditEvent => AuditEvent::new(
                "AUD001",
                Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
                "John Mugisha",
                "CREATE",
                "Member",
            )
            .into(),
            RecordKind::User => User::new(
                "U001",
                "Mary Nakato",
                "mary@coop.ug",
                "Farmer",
                "Active",
                date(2023, 5, 2),
            )
            .into(),
            RecordKind::MilkEntry => MilkEntry::new(
                "MC001",
                "Peter Okello",
                date(2024, 1, 14),
                45.5,
                "Grade A",
                "Mbarara Central",
            )
            .into(),
            RecordKind::Loan => Loan::new("LN001", "Grace Atim", "Dairy Equipment", 1_500_000.0, "Current").into(),
            RecordKind::SavingsAccount => SavingsAccount::new(
                "SA001",
                "Grace Atim",
                "Regular Savings",
                250_000.0,
                date(2022, 3, 1),
                "Dormant",
            )
            .into(),
        }
    }

    #[test]
    fn kind_matches_variant() {
        for kind in RecordKind::ALL {
            assert_eq!(sample_of(kind).kind(), kind);
        }
    }

    #[test]
    fn declared_fields_resolve_with_declared_kind() {
        for kind in RecordKind::ALL {
            let record = sample_of(kind);
            for spec in fields_of(kind) {
                if let Some(value) = record.get_field(spec.name) {
                    let ok = match (spec.kind, &value) {
                        (FieldKind::Text, FieldValue::Text(_)) => true,
                        (FieldKind::Category, FieldValue::Category(_)) => true,
                        (FieldKind::Number, FieldValue::Number(_)) => true,
                        (FieldKind::Date, FieldValue::Date(_)) => true,
                        (FieldKind::Timestamp, FieldValue::Timestamp(_)) => true,
                        (FieldKind::Nested, FieldValue::Nested(_)) => true,
                        _ => false,
                    };
                    assert!(ok, "{kind}.{} has mismatched value {value:?}", spec.name);
                }
            }
        }
    }

    #[test]
    fn undeclared_field_is_none() {
        assert!(sample_of(RecordKind::User).get_field("quality").is_none());
    }

    #[test]
    fn unset_optional_field_is_none() {
        let record = sample_of(RecordKind::Loan);
        assert!(record.get_field("issued_on").is_none());
        assert!(record.date().is_none());
    }

    #[test]
    fn date_from_timestamp_field() {
        assert_eq!(sample_of(RecordKind::AuditEvent).date(), Some(date(2024, 1, 15)));
        assert_eq!(sample_of(RecordKind::MilkEntry).date(), Some(date(2024, 1, 14)));
    }

    #[test]
    fn classification_value_by_kind() {
        assert_eq!(
            sample_of(RecordKind::AuditEvent).classification_value().as_deref(),
            Some("CREATE")
        );
        assert_eq!(
            sample_of(RecordKind::MilkEntry).classification_value().as_deref(),
            Some("Grade A")
        );
        assert_eq!(
            sample_of(RecordKind::SavingsAccount).classification_value().as_deref(),
            Some("Dormant")
        );
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let json = serde_json::to_value(sample_of(RecordKind::MilkEntry)).unwrap();
        assert_eq!(json["kind"], "milk_entry");
        assert_eq!(json["farmer_name"], "Peter Okello");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample_of(RecordKind::MilkEntry));
    }

    #[test]
    fn record_kind_parses_short_forms() {
        assert_eq!("audit".parse::<RecordKind>().unwrap(), RecordKind::AuditEvent);
        assert_eq!("milk-entry".parse::<RecordKind>().unwrap(), RecordKind::MilkEntry);
        assert_eq!("Savings".parse::<RecordKind>().unwrap(), RecordKind::SavingsAccount);
        assert!("widgets".parse::<RecordKind>().is_err());
    }
}
