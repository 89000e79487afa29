//! usage-buckets - resolve a usage time range and render a gap-free bucket series

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use usage_buckets::types::{BucketType, OutputFormat, Period, ResolvedRange, UsageBucket};
use usage_buckets::utils::format::{
    format_csv, format_json, format_table, print_banner, print_range, print_summary,
};
use usage_buckets::{fill_missing_buckets, resolve_custom_range, resolve_period_range, select_bucket_type};

#[derive(Parser)]
#[command(name = "usage-buckets")]
#[command(author, version, about = "Resolve a usage time range and render a gap-free bucket series")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Period selector (ignored when --from/--to are given)
    #[arg(short, long, value_enum, default_value = "day", global = true)]
    period: Period,

    /// Custom range start date (YYYY-MM-DD, requires --to)
    #[arg(long, requires = "to", global = true)]
    from: Option<String>,

    /// Custom range end date (YYYY-MM-DD, requires --from)
    #[arg(long, requires = "from", global = true)]
    to: Option<String>,

    /// Sparse bucket data as a JSON array or JSONL file; omit for an empty series
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override the range-derived bucket granularity
    #[arg(short, long, value_enum, global = true)]
    bucket_type: Option<BucketType>,

    /// Reference instant (RFC 3339), defaults to now
    #[arg(long, global = true)]
    now: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved range and chosen bucket granularity
    Range,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let range = resolve_range(&cli)?;
    let bucket_type = cli
        .bucket_type
        .unwrap_or_else(|| select_bucket_type(range.range_days));

    match cli.command {
        Some(Commands::Range) => run_range(&range, bucket_type),
        None => run_fill(&cli, &range, bucket_type),
    }
}

fn resolve_range(cli: &Cli) -> Result<ResolvedRange> {
    if let (Some(from), Some(to)) = (&cli.from, &cli.to) {
        return resolve_custom_range(from, to).map_err(Into::into);
    }

    let now = match &cli.now {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("invalid --now instant: {raw}"))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    Ok(resolve_period_range(cli.period, now))
}

fn run_range(range: &ResolvedRange, bucket_type: BucketType) -> Result<()> {
    print_banner();
    print_range(range, bucket_type);
    println!();
    Ok(())
}

fn run_fill(cli: &Cli, range: &ResolvedRange, bucket_type: BucketType) -> Result<()> {
    let actual = match &cli.input {
        Some(path) => load_buckets(path)
            .with_context(|| format!("failed to load buckets from {}", path.display()))?,
        None => Vec::new(),
    };

    let show_banner = matches!(cli.format, OutputFormat::Table);
    if show_banner {
        print_banner();
        if cli.verbose {
            print_range(range, bucket_type);
            println!();
            println!(
                "{}",
                format!("Loaded {} actual buckets", actual.len()).dimmed()
            );
            println!();
        }
    }

    let filled = fill_missing_buckets(
        &actual,
        range.start,
        range.end,
        bucket_type,
        UsageBucket::empty,
    );

    let output = match cli.format {
        OutputFormat::Table => format_table(&filled),
        OutputFormat::Json => format_json(&filled),
        OutputFormat::Csv => format_csv(&filled),
    };

    println!("{}", output);

    if show_banner {
        print_summary(&filled);
    }

    Ok(())
}

/// Load sparse bucket records from a JSON array file, or one JSON object per
/// line when the extension is `.jsonl`.
fn load_buckets(path: &Path) -> Result<Vec<UsageBucket>> {
    let content = fs::read_to_string(path)?;

    if path.extension().map(|e| e == "jsonl").unwrap_or(false) {
        let mut buckets = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            buckets.push(serde_json::from_str(line)?);
        }
        return Ok(buckets);
    }

    Ok(serde_json::from_str(&content)?)
}
