// File: src/cli.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::TraceConfig;
use crate::export::export_to_path;
use crate::report::{render_report, ReportOptions};
use crate::stats::Granularity;
use crate::time::parse_time_string;
use crate::{split_entries, RecordFilter, TraceParser};

pub const NO_MATCH_WARNING: &str = "no entries matched the expected format";

/// Parse an Error Trace log into a spreadsheet-ready table.
#[derive(Parser, Debug)]
#[clap(name = "mxtrace", version, about)]
pub struct CliArgs {
    /// Log file to parse.
    pub input: PathBuf,

    /// Output CSV file. Defaults to the configured output path.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Keep only these levels. Repeat for several. Default: all observed.
    #[clap(short, long = "level")]
    pub levels: Vec<String>,

    /// Keep only these codes. Repeat for several. Default: all observed.
    #[clap(short, long = "code")]
    pub codes: Vec<String>,

    /// Drop records before this time ("2023-01-02 03:00:00", "2h ago", ...).
    #[clap(long)]
    pub since: Option<String>,

    /// Drop records after this time.
    #[clap(long)]
    pub until: Option<String>,

    /// Bucket width for the logs-over-time summary.
    #[clap(short, long)]
    pub granularity: Option<Granularity>,

    /// Print a summary report to stdout.
    #[clap(short, long)]
    pub report: bool,

    /// Print the filtered records as JSON to stdout. Status lines move to stderr.
    #[clap(long)]
    pub json: bool,

    /// TOML config file (overrides MXTRACE_CONFIG).
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// What a run did, for the caller's exit handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub records: usize,
    pub exported: usize,
    pub output: PathBuf,
}

/// Runs one parse/filter/export pass.
///
/// `env` resolves environment variables, `out` receives the data (JSON,
/// report) and `status` receives human-readable status lines. With `--json`
/// the "written to" line goes to `status` so `out` stays valid JSON.
pub fn run<F, O, S>(args: CliArgs, env: F, out: &mut O, status: &mut S) -> Result<RunSummary>
where
    F: Fn(&str) -> Option<String>,
    O: Write,
    S: Write,
{
    let mut config = TraceConfig::load_with(args.config.as_deref(), env)
        .context("loading configuration")?;
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(granularity) = args.granularity {
        config.granularity = granularity;
    }

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let records = TraceParser::new().parse(&content);
    let entries = split_entries(&content).len();
    info!(entries, records = records.len(), "parsed {}", args.input.display());
    if records.is_empty() && !content.trim().is_empty() {
        warn!("{}", NO_MATCH_WARNING);
        writeln!(status, "Warning: {}", NO_MATCH_WARNING)?;
    }

    let mut filter = RecordFilter::all(&records);
    if !args.levels.is_empty() {
        filter = filter.with_levels(args.levels);
    }
    if !args.codes.is_empty() {
        filter = filter.with_codes(args.codes);
    }
    let since = args.since.as_deref().map(parse_time_string).transpose()?;
    let until = args.until.as_deref().map(parse_time_string).transpose()?;
    filter = filter.with_window(since, until);

    let selected = filter.apply(&records);
    info!(selected = selected.len(), "applied filters");

    let exported = export_to_path(&config.output, selected.iter().copied())
        .with_context(|| format!("writing {}", config.output.display()))?;

    let written = format!("Parsed log data written to: {}", config.output.display());
    if args.json {
        writeln!(status, "{}", written)?;
        writeln!(out, "{}", serde_json::to_string_pretty(&selected)?)?;
    } else {
        writeln!(out, "{}", written)?;
    }

    if args.report {
        let opts = ReportOptions {
            granularity: config.granularity,
            top_codes: config.top_codes,
            top_messages: config.top_messages,
        };
        write!(out, "{}", render_report(&selected, &opts))?;
    }

    Ok(RunSummary {
        entries,
        records: records.len(),
        exported,
        output: config.output,
    })
}
