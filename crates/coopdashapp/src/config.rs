//! # Configuration
//!
//! Dashboard settings are loaded with [`confique`] from TOML files and the
//! environment.
//!
//! ## Resolution Order
//!
//! Highest priority first:
//! 1. **Environment variables**: `COOPDASH_PAGE_SIZE`, `COOPDASH_DATA_FILE`.
//! 2. **Project config**: `coopdash.toml` in the working directory.
//! 3. **Global config**: `coopdash.toml` in the OS config directory (via `directories`).
//! 4. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `page_size` | `COOPDASH_PAGE_SIZE` | `20` | Rows per table page |
//! | `data_file` | `COOPDASH_DATA_FILE` | none | JSON file to load records from |
//! | `search_fields` | | none | Fields the search box looks at (all scalar fields when unset) |
//!
//! `page_size` is not checked here. A non-positive value is reported as
//! [`crate::error::CoopdashError::InvalidPageSize`] by the first query that
//! uses it.

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paginate::DEFAULT_PAGE_SIZE;

pub const CONFIG_FILE_NAME: &str = "coopdash.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Rows per table page.
    #[config(env = "COOPDASH_PAGE_SIZE", default = 20)]
    pub page_size: i64,

    /// JSON file with the records to report on.
    #[config(env = "COOPDASH_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Fields the search box matches against. When absent, every scalar
    /// field of the record's kind.
    pub search_fields: Option<Vec<String>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            data_file: None,
            search_fields: None,
        }
    }
}

impl ReportConfig {
    /// Load with `project_dir` as the location of the project config file.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let mut builder = Self::builder()
            .env()
            .file(project_dir.join(CONFIG_FILE_NAME));
        if let Some(global) = global_config_path() {
            builder = builder.file(global);
        }
        let config = builder.load()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Commented sample `coopdash.toml` listing every key with its default.
    pub fn template() -> String {
        confique::toml::template::<Self>(confique::toml::FormatOptions::default())
    }
}

/// Location of the global config file, when the OS has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coopdash").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}
