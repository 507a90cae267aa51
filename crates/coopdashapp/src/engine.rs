//! # Report Engine
//!
//! One query against the report viewer runs four stages in a fixed order:
//!
//! 1. **Filter**: the structured constraints from the filter bar ([`crate::filter`])
//! 2. **Search**: free text over what survived the filters ([`crate::search`])
//! 3. **Stats**: aggregate counts over the filtered and searched set ([`crate::aggregate`])
//! 4. **Paginate**: slice out the requested page ([`crate::paginate`])
//!
//! The page size is validated before stage 1, so a bad request fails without
//! doing any work and no partial result escapes.
//!
//! The engine borrows the records it is given and never mutates them. It holds
//! only a [`RuleBook`], so one engine can serve concurrent queries against the
//! same slice.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = ReportEngine::new();
//! let query = ReportQuery {
//!     search: SearchCriteria::new("john"),
//!     filters: FilterCriteria::new().with_category("CREATE"),
//!     page: PageRequest::new(1, 20),
//! };
//! let report = engine.query(&records, &query)?;
//! println!("{} of {}", report.page.records.len(), report.page.total_items);
//! ```

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, AggregateStats};
use crate::classify::{Category, ClassificationRule, RuleBook};
use crate::error::Result;
use crate::filter::{self, FilterCriteria};
use crate::model::{Record, RecordKind};
use crate::paginate::{self, PageRequest, PageResult};
use crate::search::{FieldMatcher, SearchCriteria};

/// Search, filters and page for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub search: SearchCriteria,
    pub filters: FilterCriteria,
    pub page: PageRequest,
}

impl ReportQuery {
    pub fn new(search: SearchCriteria, filters: FilterCriteria, page: PageRequest) -> Self {
        Self {
            search,
            filters,
            page,
        }
    }
}

/// The visible page and the stats over every matching record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<'a> {
    pub page: PageResult<&'a Record>,
    pub stats: AggregateStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportEngine {
    rules: RuleBook,
}

impl ReportEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: RuleBook) -> Self {
        Self { rules }
    }

    /// Override the classification rule for one kind.
    pub fn with_rule(mut self, kind: RecordKind, rule: &'static ClassificationRule) -> Self {
        self.rules = self.rules.with_rule(kind, rule);
        self
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn classify(&self, record: &Record) -> Category {
        self.rules.classify(record)
    }

    /// Every record passing the filters and the search, in input order.
    ///
    /// This is the set exports are written from; it is never paginated.
    pub fn matching<'a, I>(
        &self,
        records: I,
        search: &SearchCriteria,
        filters: &FilterCriteria,
    ) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let predicate = filter::build(filters, &self.rules);
        let filtered = filter::apply(records, &predicate);
        tracing::debug!(
            conjuncts = predicate.conjuncts().len(),
            remaining = filtered.len(),
            "filter stage"
        );

        let matcher = FieldMatcher::new(search);
        if matcher.matches_everything() {
            return filtered;
        }
        let searched = matcher.apply(filtered);
        tracing::debug!(remaining = searched.len(), "search stage");
        searched
    }

    /// Aggregate stats over the matching records.
    pub fn stats<'a, I>(
        &self,
        records: I,
        search: &SearchCriteria,
        filters: &FilterCriteria,
    ) -> AggregateStats
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let matched = self.matching(records, search, filters);
        aggregate::compute(&matched, &self.rules)
    }

    /// Run the full filter, search, stats, paginate pipeline.
    pub fn query<'a, I>(&self, records: I, query: &ReportQuery) -> Result<Report<'a>>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        paginate::validate_page_size(query.page.page_size)?;

        let matched = self.matching(records, &query.search, &query.filters);
        let stats = aggregate::compute(&matched, &self.rules);
        let page = paginate::paginate(matched, query.page)?;
        tracing::debug!(
            page = page.page,
            total_pages = page.total_pages,
            total_items = page.total_items,
            "paginate stage"
        );

        Ok(Report { page, stats })
    }
}
