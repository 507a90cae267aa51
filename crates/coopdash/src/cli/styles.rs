//! Terminal styles.
//!
//! Code asks for a style by what it shows (a header, a muted footer, a status
//! badge) and never by colour. The badge palette follows the dashboard's:
//!
//! | Category | Style |
//! |----------|-------|
//! | success | green |
//! | info | blue |
//! | warning | yellow |
//! | danger | red, bold |
//! | unknown | dim |
//!
//! `console` drops the escape codes when stdout is not a terminal, so piped
//! output and test captures stay plain.

use coopdashapp::classify::Category;
use console::Style;
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static MUTED: Lazy<Style> = Lazy::new(|| Style::new().dim());
pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static VALUE: Lazy<Style> = Lazy::new(|| Style::new().cyan());

static BADGES: Lazy<HashMap<Category, Style>> = Lazy::new(|| {
    HashMap::from([
        (Category::Success, Style::new().green()),
        (Category::Info, Style::new().blue()),
        (Category::Warning, Style::new().yellow()),
        (Category::Danger, Style::new().red().bold()),
        (Category::Unknown, Style::new().dim()),
    ])
});

/// Style for a status badge.
pub fn badge(category: Category) -> Style {
    BADGES.get(&category).cloned().unwrap_or_else(Style::new)
}
