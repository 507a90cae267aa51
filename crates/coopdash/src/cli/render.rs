//! # Rendering
//!
//! Turns library results into terminal text. Every function here returns a
//! `String`; printing happens in `commands.rs`.
//!
//! ## Table Layout
//!
//! The record table does not know any record shape. Its columns come from
//! field roles, so one layout serves every kind:
//!
//! | Column | Source |
//! |--------|--------|
//! | KIND | record kind, only when viewing all kinds |
//! | ID | identifier field |
//! | DATE | timestamp field |
//! | ACTOR | actor field (user, farmer, member) |
//! | SUBJECT | subject field (resource, centre, product) |
//! | STATUS | classification field, styled as a badge |
//!
//! Column widths fit the widest cell up to [`MAX_COL_WIDTH`]; longer values
//! are cut with an ellipsis.

use coopdashapp::aggregate::AggregateStats;
use coopdashapp::classify::{Category, RuleBook};
use coopdashapp::config::ReportConfig;
use coopdashapp::fields::{field_with_role, fields_of, FieldRole};
use coopdashapp::model::{Record, RecordKind};
use coopdashapp::paginate::PageResult;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles;

pub const MAX_COL_WIDTH: usize = 28;
const COL_GAP: &str = "  ";
const MISSING: &str = "-";

struct Cell {
    text: String,
    badge: Option<Category>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            badge: None,
        }
    }
}

fn role_text(record: &Record, role: FieldRole) -> String {
    record
        .field_with_role(role)
        .map(|v| v.render())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| MISSING.to_string())
}

fn row_for(record: &Record, show_kind: bool, rules: &RuleBook) -> Vec<Cell> {
    let mut row = Vec::with_capacity(6);
    if show_kind {
        row.push(Cell::plain(record.kind().as_str()));
    }
    row.push(Cell::plain(record.id()));
    row.push(Cell::plain(role_text(record, FieldRole::Timestamp)));
    row.push(Cell::plain(role_text(record, FieldRole::Actor)));
    row.push(Cell::plain(role_text(record, FieldRole::Subject)));
    row.push(Cell {
        text: role_text(record, FieldRole::Classification),
        badge: Some(rules.classify(record)),
    });
    row
}

/// Record table for one page, with the pagination footer.
pub fn render_page(page: &PageResult<&Record>, scope: Option<RecordKind>, rules: &RuleBook) -> String {
    if page.records.is_empty() {
        return format!("{}\n", styles::MUTED.apply_to("No matching records."));
    }

    let show_kind = scope.is_none();
    let mut headers = Vec::new();
    if show_kind {
        headers.push("KIND");
    }
    headers.extend(["ID", "DATE", "ACTOR", "SUBJECT", "STATUS"]);

    let rows: Vec<Vec<Cell>> = page
        .records
        .iter()
        .map(|r| row_for(r, show_kind, rules))
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].text.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| styles::HEADER.apply_to(pad_to_width(h, *w)).to_string())
        .collect();
    out.push_str(header_line.join(COL_GAP).trim_end());
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let text = pad_to_width(&truncate_to_width(&cell.text, *w), *w);
                match cell.badge {
                    Some(category) => styles::badge(category).apply_to(text).to_string(),
                    None => text,
                }
            })
            .collect();
        out.push_str(cells.join(COL_GAP).trim_end());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&styles::MUTED.apply_to(footer(page)).to_string());
    out.push('\n');
    out
}

/// "Showing 21-40 of 45 records · page 2 of 3"
pub fn footer<T>(page: &PageResult<T>) -> String {
    match page.item_range() {
        Some((first, last)) => format!(
            "Showing {}-{} of {} records · page {} of {}",
            first, last, page.total_items, page.page, page.total_pages
        ),
        None => format!("No records · page {} of {}", page.page, page.total_pages),
    }
}

fn top_label(scope: Option<RecordKind>, role: FieldRole, generic: &str) -> String {
    let name = scope
        .and_then(|kind| field_with_role(kind, role))
        .unwrap_or(generic);
    format!("Top {}", name.replace('_', " "))
}

/// Stat cards: total, top category/actor/subject, counts per status.
pub fn render_stats(stats: &AggregateStats, scope: Option<RecordKind>) -> String {
    const LABEL_WIDTH: usize = 24;
    let mut out = String::new();

    out.push_str(&format!(
        "{}{}\n\n",
        styles::TITLE.apply_to(pad_to_width("Total records", LABEL_WIDTH)),
        styles::VALUE.apply_to(stats.total)
    ));

    let cards = [
        (FieldRole::Category, "category", &stats.top_category, &stats.by_category),
        (FieldRole::Actor, "actor", &stats.top_actor, &stats.by_actor),
        (FieldRole::Subject, "subject", &stats.top_subject, &stats.by_subject),
    ];
    for (role, generic, top, tally) in cards {
        let label = pad_to_width(&top_label(scope, role, generic), LABEL_WIDTH);
        let value = match top {
            Some(key) => format!("{} ({})", key, tally.get(key)),
            None => MISSING.to_string(),
        };
        out.push_str(&format!("{}{}\n", label, styles::VALUE.apply_to(value)));
    }

    out.push_str(&format!("\n{}\n", styles::TITLE.apply_to("By status")));
    for category in Category::ALL {
        let count = stats.by_classification.get(category.as_str());
        if count == 0 {
            continue;
        }
        let name = pad_to_width(category.as_str(), 10);
        out.push_str(&format!("  {}{:>6}\n", styles::badge(category).apply_to(name), count));
    }
    out
}

/// Every record kind with its loaded count and field table.
pub fn render_kinds(counts: &[(RecordKind, usize)]) -> String {
    let mut out = String::new();
    for (i, (kind, count)) in counts.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let noun = if *count == 1 { "record" } else { "records" };
        out.push_str(&format!(
            "{} {}\n",
            styles::TITLE.apply_to(kind.as_str()),
            styles::MUTED.apply_to(format!("({} {})", count, noun))
        ));
        for spec in fields_of(*kind) {
            let roles: Vec<&str> = spec.roles().map(FieldRole::as_str).collect();
            let line = format!(
                "  {}{}{}",
                pad_to_width(spec.name, 22),
                pad_to_width(spec.kind.as_str(), 11),
                roles.join(", ")
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

pub fn render_config(config: &ReportConfig) -> String {
    let data_file = config
        .data_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| MISSING.to_string());
    let search_fields = config
        .search_fields
        .as_ref()
        .map(|f| f.join(", "))
        .unwrap_or_else(|| "(all scalar fields)".to_string());

    [
        ("page_size", config.page_size.to_string()),
        ("data_file", data_file),
        ("search_fields", search_fields),
    ]
    .iter()
    .map(|(key, value)| format!("{}{}\n", pad_to_width(key, 16), styles::VALUE.apply_to(value)))
    .collect()
}

/// Cut `s` to at most `max_width` columns, ending in `…` when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

/// Right-pad `s` with spaces to `width` columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coopdashapp::aggregate;
    use coopdashapp::fixtures;
    use coopdashapp::paginate::{paginate, PageRequest};

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).into_owned()
    }

    fn demo() -> Vec<Record> {
        fixtures::sample_records().unwrap()
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Mbarara Central", 8), "Mbarara…");
        assert_eq!(truncate_to_width("Kiruhura", 8), "Kiruhura");
        assert_eq!(truncate_to_width("Kiruhura", 0), "…");
    }

    #[test]
    fn pad_counts_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn page_table_shows_role_columns() {
        let records = demo();
        let loans: Vec<&Record> = records
            .iter()
            .filter(|r| r.kind() == RecordKind::Loan)
            .collect();
        let page = paginate(loans, PageRequest::new(1, 3)).unwrap();
        let out = plain(&render_page(&page, Some(RecordKind::Loan), &RuleBook::default()));

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(!lines[0].contains("KIND"));
        assert!(out.contains("LN001"));
        assert!(out.contains("Moses Kato"));
        assert!(out.contains("Overdue"));
        assert!(!out.contains("LN004"));
        assert!(out.contains("Showing 1-3 of 6 records · page 1 of 2"));
    }

    #[test]
    fn mixed_kinds_get_a_kind_column() {
        let records = demo();
        let refs: Vec<&Record> = records.iter().collect();
        let page = paginate(refs, PageRequest::new(1, 5)).unwrap();
        let out = plain(&render_page(&page, None, &RuleBook::default()));
        assert!(out.lines().next().unwrap().starts_with("KIND"));
        assert!(out.contains("audit_event"));
    }

    #[test]
    fn empty_page_says_so() {
        let page = paginate(Vec::<&Record>::new(), PageRequest::default()).unwrap();
        let out = plain(&render_page(&page, None, &RuleBook::default()));
        assert_eq!(out.trim(), "No matching records.");
    }

    #[test]
    fn stats_use_kind_specific_labels() {
        let records = demo();
        let audits: Vec<&Record> = records
            .iter()
            .filter(|r| r.kind() == RecordKind::AuditEvent)
            .collect();
        let stats = aggregate::compute(&audits, &RuleBook::default());
        let out = plain(&render_stats(&stats, Some(RecordKind::AuditEvent)));

        assert!(out.contains("Total records"));
        assert!(out.contains("Top action"));
        assert!(out.contains("CREATE (2)"));
        assert!(out.contains("Top user"));
        assert!(out.contains("Top resource"));
        assert!(out.contains("danger"));
    }

    #[test]
    fn stats_without_scope_use_generic_labels() {
        let out = plain(&render_stats(&AggregateStats::empty(), None));
        assert!(out.contains("Top category"));
        assert!(out.contains("Top actor"));
        assert!(!out.contains("success"));
    }

    #[test]
    fn kinds_lists_fields_and_roles() {
        let out = plain(&render_kinds(&[(RecordKind::MilkEntry, 8), (RecordKind::Loan, 1)]));
        assert!(out.contains("milk_entry (8 records)"));
        assert!(out.contains("loan (1 record)"));
        assert!(out.contains("quality"));
        assert!(out.contains("classification, category"));
    }

    #[test]
    fn config_shows_every_key() {
        let out = plain(&render_config(&ReportConfig::default()));
        assert!(out.contains("page_size"));
        assert!(out.contains("20"));
        assert!(out.contains("(all scalar fields)"));
    }
}
