//! # Export
//!
//! Exports write **every** record matching the active search and filters,
//! regardless of which page is on screen. The caller resolves the matching set
//! (see [`crate::engine::ReportEngine::matching`]) and hands it here together
//! with an [`ExportContext`] describing how it was selected.
//!
//! ## Formats
//!
//! | Format | Extension | Contents |
//! |--------|-----------|----------|
//! | [`ExportFormat::Json`] | `json` | `{ generated_at, total, criteria, records }` |
//! | [`ExportFormat::JsonLines`] | `jsonl` | one tagged record per line |
//! | [`ExportFormat::Archive`] | `tar.gz` | `records.json` plus `summary.json` (criteria and stats) |
//!
//! File names follow `coopdash-<kind|all>-<YYYY-MM-DD_HH-MM-SS>.<ext>`.

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::aggregate::AggregateStats;
use crate::error::{CoopdashError, Result};
use crate::filter::FilterCriteria;
use crate::model::{Record, RecordKind};
use crate::search::SearchCriteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    JsonLines,
    Archive,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::Archive => "tar.gz",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Json => "json",
            ExportFormat::JsonLines => "jsonl",
            ExportFormat::Archive => "archive",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = CoopdashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "jsonl" | "ndjson" | "json-lines" => Ok(ExportFormat::JsonLines),
            "archive" | "tar.gz" | "tgz" => Ok(ExportFormat::Archive),
            other => Err(CoopdashError::InvalidCriteria(format!(
                "unknown export format \"{}\" (expected json, jsonl or archive)",
                other
            ))),
        }
    }
}

/// How the exported set was selected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportContext {
    #[serde(skip)]
    pub generated_at: DateTime<Utc>,
    pub kind: Option<RecordKind>,
    pub search: SearchCriteria,
    pub filters: FilterCriteria,
}

impl ExportContext {
    pub fn new(kind: Option<RecordKind>, search: SearchCriteria, filters: FilterCriteria) -> Self {
        Self {
            generated_at: Utc::now(),
            kind,
            search,
            filters,
        }
    }

    pub fn at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn filename(&self, format: ExportFormat) -> String {
        export_filename(self.kind, format, self.generated_at)
    }
}

/// `coopdash-<kind|all>-<YYYY-MM-DD_HH-MM-SS>.<ext>`
pub fn export_filename(kind: Option<RecordKind>, format: ExportFormat, at: DateTime<Utc>) -> String {
    let scope = kind.map_or("all", RecordKind::as_str);
    format!(
        "coopdash-{}-{}.{}",
        scope,
        at.format("%Y-%m-%d_%H-%M-%S"),
        format.extension()
    )
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    generated_at: DateTime<Utc>,
    total: usize,
    criteria: &'a ExportContext,
    records: &'a [&'a Record],
}

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: DateTime<Utc>,
    criteria: &'a ExportContext,
    stats: &'a AggregateStats,
}

/// Pretty-printed JSON document with the selection criteria.
pub fn write_json<W: Write>(mut writer: W, ctx: &ExportContext, records: &[&Record]) -> Result<()> {
    let doc = JsonDocument {
        generated_at: ctx.generated_at,
        total: records.len(),
        criteria: ctx,
        records,
    };
    serde_json::to_writer_pretty(&mut writer, &doc)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// One record per line.
pub fn write_jsonl<W: Write>(mut writer: W, records: &[&Record]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Gzipped tar with `records.json` and `summary.json`.
pub fn write_archive<W: Write>(
    writer: W,
    ctx: &ExportContext,
    records: &[&Record],
    stats: &AggregateStats,
) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);
    let mtime = u64::try_from(ctx.generated_at.timestamp()).unwrap_or(0);

    let records_json = serde_json::to_vec_pretty(records)?;
    append_file(&mut tar, "records.json", &records_json, mtime)?;

    let summary = Summary {
        generated_at: ctx.generated_at,
        criteria: ctx,
        stats,
    };
    let summary_json = serde_json::to_vec_pretty(&summary)?;
    append_file(&mut tar, "summary.json", &summary_json, mtime)?;

    tar.into_inner()?.finish()?;
    Ok(())
}

fn append_file<W: Write>(
    tar: &mut tar::Builder<W>,
    name: &str,
    data: &[u8],
    mtime: u64,
) -> Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(mtime);
    header.set_cksum();
    tar.append_data(&mut header, name, data)?;
    Ok(())
}

/// Write `records` in `format`.
pub fn write<W: Write>(
    format: ExportFormat,
    writer: W,
    ctx: &ExportContext,
    records: &[&Record],
    stats: &AggregateStats,
) -> Result<()> {
    match format {
        ExportFormat::Json => write_json(writer, ctx, records)?,
        ExportFormat::JsonLines => write_jsonl(writer, records)?,
        ExportFormat::Archive => write_archive(writer, ctx, records, stats)?,
    }
    tracing::info!(%format, records = records.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate;
    use crate::classify::RuleBook;
    use crate::model::{Loan, MilkEntry};
    use chrono::{NaiveDate, TimeZone};
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn records() -> Vec<Record> {
        vec![
            MilkEntry::new(
                "MC001",
                "John Mugisha",
                NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
                45.5,
                "Grade A",
                "Mbarara Central",
            )
            .into(),
            Loan::new("LN001", "Grace Atim", "Dairy Equipment", 1_500_000.0, "Overdue").into(),
        ]
    }

    fn ctx() -> ExportContext {
        ExportContext::new(
            Some(RecordKind::MilkEntry),
            SearchCriteria::new("john"),
            FilterCriteria::new().with_category("Grade A"),
        )
        .at(Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 5).unwrap())
    }

    #[test]
    fn filename_includes_kind_and_timestamp() {
        assert_eq!(
            ctx().filename(ExportFormat::Archive),
            "coopdash-milk_entry-2024-01-15_14-30-05.tar.gz"
        );
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 5).unwrap();
        assert_eq!(
            export_filename(None, ExportFormat::JsonLines, at),
            "coopdash-all-2024-01-15_14-30-05.jsonl"
        );
    }

    #[test]
    fn format_parses_aliases() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("ndjson".parse::<ExportFormat>().unwrap(), ExportFormat::JsonLines);
        assert_eq!("tgz".parse::<ExportFormat>().unwrap(), ExportFormat::Archive);
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn json_document_carries_criteria_and_all_records() {
        let records = records();
        let refs: Vec<&Record> = records.iter().collect();
        let mut out = Vec::new();
        write_json(&mut out, &ctx(), &refs).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["total"], 2);
        assert_eq!(doc["generated_at"], "2024-01-15T14:30:05Z");
        assert_eq!(doc["criteria"]["kind"], "milk_entry");
        assert_eq!(doc["criteria"]["search"]["text"], "john");
        assert_eq!(doc["records"][1]["kind"], "loan");
    }

    #[test]
    fn jsonl_is_one_record_per_line() {
        let records = records();
        let refs: Vec<&Record> = records.iter().collect();
        let mut out = Vec::new();
        write_jsonl(&mut out, &refs).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: Record = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back, records[0]);
    }

    #[test]
    fn archive_contains_records_and_summary() {
        let records = records();
        let refs: Vec<&Record> = records.iter().collect();
        let stats = aggregate::compute(&refs, &RuleBook::default());
        let mut out = Vec::new();
        write_archive(&mut out, &ctx(), &refs, &stats).unwrap();

        let mut archive = tar::Archive::new(GzDecoder::new(out.as_slice()));
        let mut names = Vec::new();
        let mut summary = String::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            if name == "summary.json" {
                entry.read_to_string(&mut summary).unwrap();
            }
            names.push(name);
        }
        assert_eq!(names, vec!["records.json", "summary.json"]);

        let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(summary["stats"]["total"], 2);
        assert_eq!(summary["stats"]["by_classification"]["danger"], 1);
    }

    #[test]
    fn empty_export_is_still_a_valid_document() {
        let mut out = Vec::new();
        write(
            ExportFormat::Json,
            &mut out,
            &ctx(),
            &[],
            &AggregateStats::empty(),
        )
        .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["total"], 0);
        assert_eq!(doc["records"], serde_json::json!([]));
    }
}
