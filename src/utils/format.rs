//! Output formatting utilities

use colored::Colorize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::types::{BucketType, ResolvedRange, UsageBucket};

/// Format a number with K/M suffix for readability
pub fn format_number(num: u64) -> String {
    if num == 0 {
        return "-".to_string();
    }

    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Format cost as USD
pub fn format_cost(cost: f64) -> String {
    if cost == 0.0 {
        return "-".to_string();
    }

    if cost < 0.01 {
        return "<$0.01".to_string();
    }

    format!("${:.2}", cost)
}

/// Table row for display
#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Bucket Start")]
    pub bucket_start: String,
    #[tabled(rename = "Requests")]
    pub requests: String,
    #[tabled(rename = "Input")]
    pub input: String,
    #[tabled(rename = "Output")]
    pub output: String,
    #[tabled(rename = "Est. Cost")]
    pub cost: String,
}

/// Format a bucket series as a table
pub fn format_table(buckets: &[UsageBucket]) -> String {
    let rows: Vec<TableRow> = buckets
        .iter()
        .map(|bucket| TableRow {
            bucket_start: bucket.bucket_start.clone(),
            requests: format_number(bucket.request_count),
            input: format_number(bucket.input_tokens),
            output: format_number(bucket.output_tokens),
            cost: format_cost(bucket.estimated_cost),
        })
        .collect();

    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::left()))
        .to_string()
}

/// Format a bucket series as JSON
pub fn format_json(buckets: &[UsageBucket]) -> String {
    serde_json::to_string_pretty(buckets).unwrap_or_else(|_| "[]".to_string())
}

/// Format a bucket series as CSV
pub fn format_csv(buckets: &[UsageBucket]) -> String {
    let mut output = String::from("Bucket Start,Requests,Input Tokens,Output Tokens,Est Cost\n");

    for bucket in buckets {
        output.push_str(&format!(
            "{},{},{},{},{:.2}\n",
            bucket.bucket_start,
            bucket.request_count,
            bucket.input_tokens,
            bucket.output_tokens,
            bucket.estimated_cost
        ));
    }

    output
}

/// Print banner
pub fn print_banner() {
    println!();
    println!("{}", "  usage-buckets - Usage Range & Bucket Series".cyan().bold());
    println!();
}

/// Print a resolved range and its chosen granularity
pub fn print_range(range: &ResolvedRange, bucket_type: BucketType) {
    println!("{}", "Resolved Range:".bold());
    println!("  {} {}", "Start:".dimmed(), range.start.to_rfc3339());
    println!("  {}   {}", "End:".dimmed(), range.end.to_rfc3339());
    println!(
        "  {}  {} ({} to {})",
        "Days:".dimmed(),
        range.range_days,
        range.start_date,
        range.end_date
    );
    println!("  {} {}", "Bucket:".dimmed(), bucket_type.to_string().cyan());
}

/// Print the post-table summary line
pub fn print_summary(buckets: &[UsageBucket]) {
    let with_data = buckets.iter().filter(|b| !b.is_empty()).count();
    println!(
        "\n{}: {} buckets, {} with data\n",
        "Summary".bold(),
        buckets.len(),
        with_data.to_string().green()
    );
}
