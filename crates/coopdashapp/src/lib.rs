//! # Coopdash Architecture
//!
//! Coopdash is the **report engine behind a cooperative's dashboard**: audit
//! logs, member accounts, milk collections, loans and savings. It is a
//! UI-agnostic library; the `coopdash` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (crates/coopdash)                                      │
//! │  - Parses arguments, renders tables, owns stdout/stderr     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Loads from a RecordSource, applies config and kind scope │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (engine.rs)                                         │
//! │  - filter → search → stats → paginate                       │
//! │  - Pure functions over a borrowed record slice              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Sources (source/)                                          │
//! │  - RecordSource trait: MemorySource, JsonFileSource         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward nothing prints, exits, or assumes a terminal. Records
//! are never mutated; a query borrows them and returns references.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade UI clients talk to
//! - [`engine`]: the query pipeline
//! - [`filter`]: structured filter criteria and predicates
//! - [`search`]: free-text search
//! - [`classify`]: status to badge-category rules
//! - [`aggregate`]: stat-card counts
//! - [`paginate`]: page slicing and clamping
//! - [`export`]: JSON, JSON lines and tar.gz exports
//! - [`fields`]: per-kind field tables and field values
//! - [`model`]: record types
//! - [`source`]: where records come from
//! - [`config`]: configuration loading
//! - [`fixtures`]: demo dataset
//! - [`error`]: error types

pub mod aggregate;
pub mod api;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod fixtures;
pub mod model;
pub mod paginate;
pub mod search;
pub mod source;
