//! Demo dataset.
//!
//! A small cooperative's worth of records across every kind, used by
//! `coopdash --demo` and by tests that want realistic data. The set is fixed,
//! so counts below are stable.
//!
//! | Kind | Records |
//! |------|---------|
//! | audit events | 9 |
//! | users | 7 |
//! | milk entries | 8 |
//! | loans | 6 |
//! | savings accounts | 6 |

use crate::error::Result;
use crate::model::Record;
use crate::source::json_file::parse_records;
use crate::source::MemorySource;

const DEMO_JSON: &str = include_str!("../data/demo.json");

/// Every demo record, in display order.
pub fn sample_records() -> Result<Vec<Record>> {
    parse_records(DEMO_JSON)
}

/// The demo records wrapped in a [`MemorySource`].
pub fn demo_source() -> Result<MemorySource> {
    Ok(MemorySource::new(sample_records()?))
}
