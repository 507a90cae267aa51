//! # Field System
//!
//! Records of different kinds share no struct shape, yet search, filtering and
//! aggregation have to treat them uniformly. This module provides the common
//! vocabulary:
//!
//! - **Values**: [`FieldValue`], the runtime form of any field, with one
//!   canonical stringification
//! - **Specifications**: per-kind tables ([`fields_of`]) naming every field,
//!   its kind, and its roles
//! - **Filtering**: [`FieldFilter`], a condition on a single named field
//!
//! ## Field Kinds
//!
//! | Kind | Examples | Rendered as |
//! |------|----------|-------------|
//! | `Text` | `farmer_name`, `details` | verbatim |
//! | `Number` | `quantity_litres`, `balance` | `500000`, `45.50` |
//! | `Date` | `collected_on`, `joined_on` | `2024-01-14` |
//! | `Timestamp` | `timestamp` | `2024-01-14T08:15:00Z` |
//! | `Category` | `action`, `status`, `quality` | verbatim |
//! | `Nested` | `metadata` | `key=value; key=value` |
//!
//! ## Roles
//!
//! A field can carry roles ([`FieldRole`]) that the engine looks up by kind:
//! the identifier, the timestamp the date filter uses, the raw value the
//! classifier buckets, and the category/actor/subject fields the aggregate
//! cards count.
//!
//! ## Usage
//!
//! ```ignore
//! let date_field = field_with_role(record.kind(), FieldRole::Timestamp);
//! let value = record.get_field("quality").map(|v| v.render());
//!
//! let filter = FieldFilter::one_of("action", vec!["CREATE".into()]);
//! if filter.matches(&record) { ... }
//! ```

mod filter;
mod spec;
mod value;

pub use filter::FieldFilter;
pub use spec::{
    field_with_role, fields_of, get_spec, scalar_fields, FieldKind, FieldRole, FieldSpec,
    AUDIT_EVENT_FIELDS, LOAN_FIELDS, MILK_ENTRY_FIELDS, SAVINGS_ACCOUNT_FIELDS, USER_FIELDS,
};
pub use value::{format_number, FieldValue};
