//! # Record Sources
//!
//! The engine works on an in-memory slice and never fetches anything itself.
//! Getting records into memory is the job of a [`RecordSource`]:
//!
//! - [`memory::MemorySource`]: records handed over directly (demo data, tests).
//! - [`json_file::JsonFileSource`]: records read from a JSON file exported by
//!   the back office.
//!
//! [`crate::api::ReportApi`] calls [`RecordSource::load`] once when it is
//! built and again on `reload`; every query in between runs against the
//! loaded slice.

use crate::error::Result;
use crate::model::Record;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSource;
pub use memory::MemorySource;

/// Anything that can produce the full set of dashboard records.
pub trait RecordSource {
    /// Load every record, in display order.
    fn load(&self) -> Result<Vec<Record>>;

    /// Short description for log lines and error messages.
    fn describe(&self) -> String;
}
