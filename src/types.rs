//! Core types for usage-buckets

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::range::anchor_offset;

/// Human-meaningful period selector for the resolver.
///
/// Custom start/end dates are handled by `range::resolve_custom_range`, not a
/// variant here, because they carry their own validation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Week => write!(f, "week"),
            Period::Month => write!(f, "month"),
        }
    }
}

/// A concrete, timezone-anchored time range resolved from a period selector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRange {
    /// Range start instant
    pub start: DateTime<Utc>,
    /// Range end instant
    pub end: DateTime<Utc>,
    /// Inclusive day count between the two calendar dates
    pub range_days: i64,
    /// Start calendar date in the anchor timezone (YYYY-MM-DD)
    pub start_date: String,
    /// End calendar date in the anchor timezone (YYYY-MM-DD)
    pub end_date: String,
}

/// Aggregation granularity for charting a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BucketType {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

impl fmt::Display for BucketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketType::Minute => write!(f, "minute"),
            BucketType::Hour => write!(f, "hour"),
            BucketType::Day => write!(f, "day"),
            BucketType::Week => write!(f, "week"),
            BucketType::Month => write!(f, "month"),
        }
    }
}

/// Any record the gap filler can place into a series.
///
/// The only requirement is a bucket-start timestamp string; metric fields are
/// the caller's business.
pub trait BucketRecord {
    /// The bucket's start instant as an ISO-8601 string
    fn bucket_start(&self) -> &str;
}

/// Usage metrics for a single aggregation bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageBucket {
    /// Bucket start instant (ISO-8601)
    pub bucket_start: String,
    /// Number of requests/interactions
    #[serde(default)]
    pub request_count: u64,
    /// Total input tokens
    #[serde(default)]
    pub input_tokens: u64,
    /// Total output tokens
    #[serde(default)]
    pub output_tokens: u64,
    /// Estimated cost in USD
    #[serde(default)]
    pub estimated_cost: f64,
}

impl UsageBucket {
    /// Zero-valued placeholder for a bucket the data source had nothing for.
    pub fn empty(bucket_start: DateTime<Utc>) -> Self {
        Self {
            bucket_start: format_bucket_start(bucket_start),
            ..Self::default()
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }

    pub fn is_empty(&self) -> bool {
        self.request_count == 0 && self.total_tokens() == 0
    }
}

impl BucketRecord for UsageBucket {
    fn bucket_start(&self) -> &str {
        &self.bucket_start
    }
}

/// Render a bucket-start instant in the anchor timezone, e.g.
/// `2024-06-15T00:00:00+09:00`.
pub fn format_bucket_start(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(anchor_offset())
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// CLI output format
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_bucket_is_zeroed_and_anchored() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap();
        let bucket = UsageBucket::empty(instant);
        assert_eq!(bucket.bucket_start, "2024-06-15T00:00:00+09:00");
        assert_eq!(bucket.request_count, 0);
        assert_eq!(bucket.total_tokens(), 0);
        assert!(bucket.is_empty());
    }

    #[test]
    fn bucket_metric_fields_default_when_absent() {
        let bucket: UsageBucket =
            serde_json::from_str(r#"{"bucket_start":"2024-06-15T00:00:00+09:00"}"#).unwrap();
        assert_eq!(bucket.request_count, 0);
        assert_eq!(bucket.input_tokens, 0);
        assert_eq!(bucket.estimated_cost, 0.0);
    }
}
