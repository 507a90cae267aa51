//! Command handlers and the translation from flags to library criteria.

use anyhow::{bail, Context, Result};
use coopdashapp::api::ReportApi;
use coopdashapp::classify::Category;
use coopdashapp::config::ReportConfig;
use coopdashapp::engine::ReportQuery;
use coopdashapp::error::Result as AppResult;
use coopdashapp::export::ExportFormat;
use coopdashapp::filter::{CategoryFilter, DateRange, FilterCriteria};
use coopdashapp::fixtures;
use coopdashapp::model::{Record, RecordKind};
use coopdashapp::paginate::PageRequest;
use coopdashapp::search::SearchCriteria;
use coopdashapp::source::{JsonFileSource, MemorySource, RecordSource};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::logging::init_logging;
use super::render;
use super::setup::{parse_cli, Cli, Commands, QueryArgs};

const ALL: &str = "all";

/// Where the CLI's records come from.
pub enum CliSource {
    Demo(MemorySource),
    File(JsonFileSource),
}

impl RecordSource for CliSource {
    fn load(&self) -> AppResult<Vec<Record>> {
        match self {
            CliSource::Demo(source) => source.load(),
            CliSource::File(source) => source.load(),
        }
    }

    fn describe(&self) -> String {
        match self {
            CliSource::Demo(_) => "demo dataset".to_string(),
            CliSource::File(source) => source.describe(),
        }
    }
}

/// Search, filters and kind scope parsed from the shared flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub kind: Option<RecordKind>,
    pub search: SearchCriteria,
    pub filters: FilterCriteria,
}

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

impl Selection {
    pub fn from_args(args: &QueryArgs) -> Result<Self> {
        let kind = if is_all(&args.kind) {
            None
        } else {
            Some(args.kind.parse::<RecordKind>()?)
        };

        let mut search = SearchCriteria::new(args.search.clone().unwrap_or_default());
        if !args.fields.is_empty() {
            search = search.in_fields(args.fields.iter().map(|f| f.trim()));
        }
        search.validate(kind)?;

        let mut filters = FilterCriteria::new();

        let categories: Vec<&String> = args.category.iter().filter(|c| !is_all(c)).collect();
        if !categories.is_empty() {
            let mut category = CategoryFilter::new(categories);
            if let Some(field) = &args.category_field {
                category = category.in_field(field.clone());
            }
            filters = filters.with_category_filter(category);
        }

        if args.from.is_some() || args.to.is_some() {
            if let (Some(from), Some(to)) = (args.from, args.to) {
                if from > to {
                    bail!("--from {} is after --to {}", from, to);
                }
            }
            filters = filters.with_date_range(DateRange::new(args.from, args.to));
        }

        let statuses = args
            .status
            .iter()
            .filter(|s| !is_all(s))
            .map(|s| s.parse::<Category>())
            .collect::<AppResult<Vec<_>>>()?;
        if !statuses.is_empty() {
            filters = filters.with_classifications(statuses);
        }

        Ok(Self {
            kind,
            search,
            filters,
        })
    }
}

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose)?;

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = ReportConfig::load(&cwd).context("loading configuration")?;

    if let Some(Commands::Config { template }) = &cli.command {
        return handle_config(&config, *template);
    }

    let api = build_api(&cli, config)?;

    match cli.command {
        None => handle_list(&api, &QueryArgs::default(), 1, None, false),
        Some(Commands::List {
            query,
            page,
            page_size,
            json,
        }) => handle_list(&api, &query, page, page_size, json),
        Some(Commands::Stats { query, json }) => handle_stats(&api, &query, json),
        Some(Commands::Export {
            query,
            format,
            output,
        }) => handle_export(&api, &query, &format, output.as_deref()),
        Some(Commands::Kinds) => handle_kinds(&api),
        Some(Commands::Config { .. }) => Ok(()),
    }
}

fn build_api(cli: &Cli, config: ReportConfig) -> Result<ReportApi<CliSource>> {
    let source = if cli.demo {
        CliSource::Demo(fixtures::demo_source()?)
    } else {
        let path = cli
            .data
            .clone()
            .or_else(|| config.data_file.clone())
            .context("no records to show: pass --data FILE, set COOPDASH_DATA_FILE, or use --demo")?;
        CliSource::File(JsonFileSource::new(path))
    };
    Ok(ReportApi::new(source, config)?)
}

fn handle_list<S: RecordSource>(
    api: &ReportApi<S>,
    args: &QueryArgs,
    page: i64,
    page_size: Option<i64>,
    json: bool,
) -> Result<()> {
    let selection = Selection::from_args(args)?;
    let request = ReportQuery {
        search: selection.search,
        filters: selection.filters,
        page: match page_size {
            Some(size) => PageRequest::new(page, size),
            None => api.page_request(page),
        },
    };
    let report = api.query(selection.kind, &request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render::render_page(&report.page, selection.kind, api.engine().rules())
        );
    }
    Ok(())
}

fn handle_stats<S: RecordSource>(api: &ReportApi<S>, args: &QueryArgs, json: bool) -> Result<()> {
    let selection = Selection::from_args(args)?;
    let stats = api.stats(selection.kind, &selection.search, &selection.filters);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render::render_stats(&stats, selection.kind));
    }
    Ok(())
}

fn handle_export<S: RecordSource>(
    api: &ReportApi<S>,
    args: &QueryArgs,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let selection = Selection::from_args(args)?;
    let format: ExportFormat = format.parse()?;
    let ctx = api.export_context(selection.kind, &selection.search, &selection.filters);

    if output == Some(Path::new("-")) {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        api.export_with(&ctx, format, &mut writer)?;
        writer.flush()?;
        return Ok(());
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(ctx.filename(format)));
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let count = api.export_with(&ctx, format, &mut writer)?;
    writer.flush()?;

    let noun = if count == 1 { "record" } else { "records" };
    println!("Exported {} {} to {}", count, noun, path.display());
    Ok(())
}

fn handle_kinds<S: RecordSource>(api: &ReportApi<S>) -> Result<()> {
    print!("{}", render::render_kinds(&api.counts_by_kind()));
    Ok(())
}

fn handle_config(config: &ReportConfig, template: bool) -> Result<()> {
    if template {
        print!("{}", ReportConfig::template());
    } else {
        print!("{}", render::render_config(config));
    }
    Ok(())
}
