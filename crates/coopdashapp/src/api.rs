//! # API Facade
//!
//! [`ReportApi`] is the single entry point UI clients use. It owns a
//! [`RecordSource`], the records loaded from it, a [`ReportEngine`] and the
//! [`ReportConfig`], and exposes the report viewer's operations:
//!
//! | Operation | Returns |
//! |-----------|---------|
//! | [`ReportApi::query`] | one page plus stats |
//! | [`ReportApi::stats`] | stats only |
//! | [`ReportApi::matching`] | every matching record, unpaginated |
//! | [`ReportApi::export`] | writes every matching record |
//! | [`ReportApi::reload`] | re-reads the source |
//!
//! ## Kind Scope
//!
//! The viewer shows one tab per record kind. Every operation takes an
//! `Option<RecordKind>`; `Some(kind)` narrows the corpus to that kind before
//! filtering, `None` queries across all kinds.
//!
//! ## Configured Search Fields
//!
//! When the config names `search_fields` and a query does not, the configured
//! list is used, narrowed to the fields the selected kind actually has. A kind
//! with none of them falls back to all of its scalar fields. Across all kinds
//! the list is used as is, so records of a kind lacking every configured field
//! never match a non-empty search there.
//!
//! Field lists passed with a query are checked by [`ReportApi::query`]; see
//! [`SearchCriteria::validate`].
//!
//! ## Generic Over RecordSource
//!
//! - Production: `ReportApi<JsonFileSource>`
//! - Demo and tests: `ReportApi<MemorySource>`
//!
//! The API does no printing and no formatting; it returns data.

use std::borrow::Cow;
use std::io::Write;

use crate::aggregate::{self, AggregateStats};
use crate::config::ReportConfig;
use crate::engine::{Report, ReportEngine, ReportQuery};
use crate::error::Result;
use crate::export::{self, ExportContext, ExportFormat};
use crate::fields::get_spec;
use crate::filter::FilterCriteria;
use crate::model::{Record, RecordKind};
use crate::paginate::PageRequest;
use crate::search::SearchCriteria;
use crate::source::RecordSource;

pub struct ReportApi<S: RecordSource> {
    source: S,
    records: Vec<Record>,
    engine: ReportEngine,
    config: ReportConfig,
}

impl<S: RecordSource> ReportApi<S> {
    /// Load the source and build the API around it.
    pub fn new(source: S, config: ReportConfig) -> Result<Self> {
        let records = source.load()?;
        tracing::info!(source = %source.describe(), count = records.len(), "records loaded");
        Ok(Self {
            source,
            records,
            engine: ReportEngine::new(),
            config,
        })
    }

    pub fn with_engine(mut self, engine: ReportEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    /// Page request using the configured page size.
    pub fn page_request(&self, page: i64) -> PageRequest {
        PageRequest::new(page, self.config.page_size)
    }

    /// Re-read the source, replacing the loaded records. Returns the new count.
    pub fn reload(&mut self) -> Result<usize> {
        self.records = self.source.load()?;
        tracing::info!(source = %self.source.describe(), count = self.records.len(), "records reloaded");
        Ok(self.records.len())
    }

    /// Number of loaded records per kind, in [`RecordKind::ALL`] order.
    pub fn counts_by_kind(&self) -> Vec<(RecordKind, usize)> {
        RecordKind::ALL
            .into_iter()
            .map(|kind| (kind, self.scoped(Some(kind)).count()))
            .collect()
    }

    pub fn query(&self, kind: Option<RecordKind>, request: &ReportQuery) -> Result<Report<'_>> {
        request.search.validate(kind)?;
        let search = self.effective_search(kind, &request.search);
        let query = ReportQuery {
            search: search.into_owned(),
            filters: request.filters.clone(),
            page: request.page,
        };
        self.engine.query(self.scoped(kind), &query)
    }

    pub fn matching(
        &self,
        kind: Option<RecordKind>,
        search: &SearchCriteria,
        filters: &FilterCriteria,
    ) -> Vec<&Record> {
        let search = self.effective_search(kind, search);
        self.engine.matching(self.scoped(kind), &search, filters)
    }

    pub fn stats(
        &self,
        kind: Option<RecordKind>,
        search: &SearchCriteria,
        filters: &FilterCriteria,
    ) -> AggregateStats {
        let matched = self.matching(kind, search, filters);
        aggregate::compute(&matched, self.engine.rules())
    }

    /// Context describing an export of the given selection, stamped now.
    pub fn export_context(
        &self,
        kind: Option<RecordKind>,
        search: &SearchCriteria,
        filters: &FilterCriteria,
    ) -> ExportContext {
        ExportContext::new(kind, self.effective_search(kind, search).into_owned(), filters.clone())
    }

    /// Write every record matching `ctx` to `writer`. Returns the record count.
    pub fn export_with<W: Write>(
        &self,
        ctx: &ExportContext,
        format: ExportFormat,
        writer: W,
    ) -> Result<usize> {
        let matched = self.engine.matching(self.scoped(ctx.kind), &ctx.search, &ctx.filters);
        let stats = aggregate::compute(&matched, self.engine.rules());
        export::write(format, writer, ctx, &matched, &stats)?;
        Ok(matched.len())
    }

    pub fn export<W: Write>(
        &self,
        kind: Option<RecordKind>,
        search: &SearchCriteria,
        filters: &FilterCriteria,
        format: ExportFormat,
        writer: W,
    ) -> Result<usize> {
        let ctx = self.export_context(kind, search, filters);
        self.export_with(&ctx, format, writer)
    }

    fn scoped(&self, kind: Option<RecordKind>) -> impl Iterator<Item = &Record> + '_ {
        self.records
            .iter()
            .filter(move |r| kind.map_or(true, |k| r.kind() == k))
    }

    fn effective_search<'a>(
        &self,
        kind: Option<RecordKind>,
        search: &'a SearchCriteria,
    ) -> Cow<'a, SearchCriteria> {
        let (None, Some(configured)) = (&search.fields, &self.config.search_fields) else {
            return Cow::Borrowed(search);
        };
        let fields: Vec<String> = match kind {
            Some(kind) => configured
                .iter()
                .filter(|name| get_spec(kind, name).is_some())
                .cloned()
                .collect(),
            None => configured.clone(),
        };
        if fields.is_empty() {
            return Cow::Borrowed(search);
        }
        Cow::Owned(SearchCriteria {
            text: search.text.clone(),
            fields: Some(fields),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::error::CoopdashError;
    use crate::fixtures;
    use crate::model::{Loan, MilkEntry, User};
    use crate::source::MemorySource;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn demo_api() -> ReportApi<MemorySource> {
        ReportApi::new(fixtures::demo_source().unwrap(), ReportConfig::default()).unwrap()
    }

    #[test]
    fn kind_scope_narrows_the_corpus() {
        let api = demo_api();
        let all = api.matching(None, &SearchCriteria::default(), &FilterCriteria::default());
        let loans = api.matching(
            Some(RecordKind::Loan),
            &SearchCriteria::default(),
            &FilterCriteria::default(),
        );
        assert_eq!(all.len(), api.records().len());
        assert_eq!(loans.len(), 6);
        assert!(loans.iter().all(|r| r.kind() == RecordKind::Loan));
    }

    #[test]
    fn counts_by_kind_cover_every_record() {
        let api = demo_api();
        let counts = api.counts_by_kind();
        assert_eq!(counts.len(), 5);
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, api.records().len());
    }

    #[test]
    fn query_uses_engine_pipeline() {
        let api = demo_api();
        let request = ReportQuery {
            filters: FilterCriteria::new().with_classification(Category::Danger),
            page: api.page_request(1),
            ..Default::default()
        };
        let report = api.query(Some(RecordKind::Loan), &request).unwrap();
        let ids: Vec<_> = report.page.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["LN001", "LN005"]);
        assert_eq!(report.stats.total, 2);
    }

    #[test]
    fn configured_page_size_is_validated_at_query_time() {
        let config = ReportConfig {
            page_size: -5,
            ..Default::default()
        };
        let api = ReportApi::new(fixtures::demo_source().unwrap(), config).unwrap();
        let request = ReportQuery {
            page: api.page_request(1),
            ..Default::default()
        };
        let err = api.query(None, &request).unwrap_err();
        assert!(matches!(err, CoopdashError::InvalidPageSize(-5)));
    }

    #[test]
    fn configured_search_fields_apply_when_query_has_none() {
        let source = MemorySource::new(vec![User::new(
            "U1",
            "John Mugisha",
            "jm@coop.ug",
            "Farmer",
            "Active",
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        )
        .into()]);
        let config = ReportConfig {
            search_fields: Some(vec!["email".to_string()]),
            ..Default::default()
        };
        let api = ReportApi::new(source, config).unwrap();

        let by_name = SearchCriteria::new("mugisha");
        assert!(api.matching(None, &by_name, &FilterCriteria::default()).is_empty());

        let explicit = SearchCriteria::new("mugisha").in_fields(["name"]);
        assert_eq!(api.matching(None, &explicit, &FilterCriteria::default()).len(), 1);
    }

    #[test]
    fn configured_search_fields_are_narrowed_to_the_kind() {
        let source = MemorySource::new(vec![
            MilkEntry::new(
                "MC1",
                "Moses Kato",
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                12.5,
                "Grade A",
                "Mbarara",
            )
            .into(),
            Loan::new("LN1", "Moses Kato", "Livestock", 500000.0, "Current").into(),
        ]);
        let config = ReportConfig {
            search_fields: Some(vec!["farmer_name".to_string(), "quality".to_string()]),
            ..Default::default()
        };
        let api = ReportApi::new(source, config).unwrap();
        let kato = SearchCriteria::new("kato");

        let milk = api.matching(Some(RecordKind::MilkEntry), &kato, &FilterCriteria::default());
        assert_eq!(milk.len(), 1);

        // loans have none of the configured fields, so all scalar fields are searched
        let loans = api.matching(Some(RecordKind::Loan), &kato, &FilterCriteria::default());
        let ids: Vec<_> = loans.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["LN1"]);

        // across kinds the configured list applies as is
        let all = api.matching(None, &kato, &FilterCriteria::default());
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn query_rejects_unknown_search_field() {
        let api = demo_api();
        let request = ReportQuery {
            search: SearchCriteria::new("john").in_fields(["nmae"]),
            page: api.page_request(1),
            ..Default::default()
        };
        let err = api.query(Some(RecordKind::User), &request).unwrap_err();
        assert!(matches!(err, CoopdashError::InvalidCriteria(_)));

        let blank = ReportQuery {
            search: SearchCriteria::new("john").in_fields([""]),
            page: api.page_request(1),
            ..Default::default()
        };
        assert!(api.query(None, &blank).is_err());
    }

    #[test]
    fn export_writes_all_matches_regardless_of_page_size() {
        let config = ReportConfig {
            page_size: 1,
            ..Default::default()
        };
        let api = ReportApi::new(fixtures::demo_source().unwrap(), config).unwrap();
        let mut out = Vec::new();
        let count = api
            .export(
                Some(RecordKind::MilkEntry),
                &SearchCriteria::default(),
                &FilterCriteria::new().with_category("Grade A"),
                ExportFormat::JsonLines,
                &mut out,
            )
            .unwrap();

        assert_eq!(count, 4);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    struct CountingSource {
        loads: RefCell<usize>,
    }

    impl RecordSource for CountingSource {
        fn load(&self) -> Result<Vec<Record>> {
            let mut loads = self.loads.borrow_mut();
            *loads += 1;
            Ok((0..*loads)
                .map(|i| Loan::new(format!("LN{i}"), "Grace Atim", "Dairy", 1.0, "Current").into())
                .collect())
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    #[test]
    fn reload_replaces_records() {
        let source = CountingSource {
            loads: RefCell::new(0),
        };
        let mut api = ReportApi::new(source, ReportConfig::default()).unwrap();
        assert_eq!(api.records().len(), 1);

        assert_eq!(api.reload().unwrap(), 2);
        assert_eq!(api.records().len(), 2);
        assert_eq!(*api.source().loads.borrow(), 2);
    }
}
