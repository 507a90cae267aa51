//! # CLI Behavior
//!
//! For the overall layout, see the crate-level documentation in [`crate`].
//!
//! The only place in the workspace that prints, reads the process
//! environment, or decides exit codes.
//!
//! ## Responsibilities
//!
//! 1. **Parsing**: clap turns arguments into `setup::Cli`
//! 2. **Context**: load `ReportConfig`, pick a record source, build the API
//! 3. **Translation**: `QueryArgs` become library criteria
//! 4. **Dispatch**: one handler per command, each returning `Result`
//! 5. **Output**: render to stdout; logs and errors go to stderr
//!
//! ## Record Source
//!
//! `--demo` uses the built-in dataset. Otherwise `--data FILE`, then the
//! configured `data_file` (`COOPDASH_DATA_FILE`). With none of them there is
//! nothing to show and the command fails. `config` needs no source.
//!
//! ## Dropdown Values
//!
//! The filter dropdowns in the dashboard default to "all". The CLI accepts
//! the same word for `--kind`, `--category` and `--status` and treats it as
//! no constraint.
//!
//! ## Naked Execution
//!
//! Running `coopdash` with no subcommand is `coopdash list` with default flags.

mod commands;
mod logging;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
