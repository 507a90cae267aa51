//! # Coopdash CLI
//!
//! The binary is a thin client over the `coopdashapp` library. This file only
//! calls `cli::run()` and turns an error into exit code 1; everything else
//! lives in `src/cli/`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (src/cli/)                                             │
//! │  - clap parsing (setup.rs)                                  │
//! │  - source selection and dispatch (commands.rs)              │
//! │  - tables, badges and stat cards (render.rs, styles.rs)     │
//! │  - tracing subscriber (logging.rs)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  coopdashapp::api::ReportApi                                │
//! │  - loads records, runs queries, writes exports              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering functions return `String`s so they can be tested without a
//! terminal; only `commands.rs` prints.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
