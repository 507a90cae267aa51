//! Records from a JSON file.
//!
//! Two layouts are accepted:
//!
//! ```text
//! [ { "kind": "loan", ... }, { "kind": "user", ... } ]
//! { "records": [ { "kind": "loan", ... } ] }
//! ```
//!
//! The second is what `coopdash export --format json` writes, so an export can
//! be loaded straight back in.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::RecordSource;
use crate::error::{CoopdashError, Result};
use crate::model::Record;

#[derive(Deserialize)]
#[serde(untagged)]
enum Layout {
    Bare(Vec<Record>),
    Wrapped { records: Vec<Record> },
}

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Record>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            CoopdashError::Source(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let records = parse_records(&content).map_err(|e| {
            CoopdashError::Source(format!("cannot parse {}: {}", self.path.display(), e))
        })?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "parsed record file");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse either accepted layout.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let layout: Layout = serde_json::from_str(content)?;
    Ok(match layout {
        Layout::Bare(records) => records,
        Layout::Wrapped { records } => records,
    })
}
