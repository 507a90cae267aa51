use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// `v0.3.0` for tagged builds, `v0.3.0 (dev abc1234, 2024-01-15 14:30)` otherwise.
fn get_version() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();

    VERSION.get_or_init(|| {
        let base = format!("v{}", env!("CARGO_PKG_VERSION"));
        match (env!("IS_RELEASE"), env!("GIT_HASH")) {
            ("true", _) | (_, "") => base,
            (_, hash) => format!("{} (dev {}, {})", base, hash, env!("GIT_COMMIT_DATE")),
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "coopdash",
    bin_name = "coopdash",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Record kinds: audit, users, milk, loans, savings (or all)\nStatuses: success, info, warning, danger, unknown"
)]
#[command(about = "Browse, filter and export cooperative records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON file with the records to load (overrides COOPDASH_DATA_FILE)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Use the built-in demo dataset
    #[arg(long, global = true, conflicts_with = "data", help_heading = "Options")]
    pub demo: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

/// Search and filter flags shared by `list`, `stats` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Record kind: audit, users, milk, loans, savings, or all
    #[arg(short, long, default_value = "all")]
    pub kind: String,

    /// Free-text search, case-insensitive
    #[arg(short, long)]
    pub search: Option<String>,

    /// Comma-separated fields the search looks at
    #[arg(long, value_delimiter = ',', value_name = "FIELDS")]
    pub fields: Vec<String>,

    /// Category value to keep (repeatable); "all" means no constraint
    #[arg(short, long, value_name = "VALUE")]
    pub category: Vec<String>,

    /// Field the category applies to (defaults to the kind's category field)
    #[arg(long, value_name = "FIELD")]
    pub category_field: Option<String>,

    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Latest date to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Status bucket to keep (repeatable); "all" means no constraint
    #[arg(long, value_name = "STATUS")]
    pub status: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a page of matching records
    #[command(alias = "ls", display_order = 1)]
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Page to show (out-of-range pages show the nearest page)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Rows per page (defaults to the configured page size)
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,

        /// Print the page and stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show summary statistics for matching records
    #[command(display_order = 2)]
    Stats {
        #[command(flatten)]
        query: QueryArgs,

        /// Print the stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write every matching record to a file
    #[command(display_order = 3)]
    Export {
        #[command(flatten)]
        query: QueryArgs,

        /// json, jsonl or archive
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output path ("-" for stdout); defaults to a timestamped file name
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// List record kinds with their fields
    #[command(display_order = 4)]
    Kinds,

    /// Show the effective configuration
    #[command(display_order = 5)]
    Config {
        /// Print a commented sample coopdash.toml instead
        #[arg(long)]
        template: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got \"{}\" ({})", s, e))
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
