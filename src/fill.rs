//! Gap filling: merge sparse actual buckets into the full expected series.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::bucket::generate_bucket_timestamps;
use crate::types::{BucketRecord, BucketType};

/// Produce a gap-free, chronological bucket series for `[start, end]`.
///
/// Actual buckets are matched to expected timestamps by their parsed
/// `bucket_start` instant; any expected timestamp with no match gets
/// `make_empty(timestamp)` instead. Input order does not matter, and actual
/// buckets whose timestamp is unparseable or not in the expected sequence
/// are dropped. Output length always equals the expected sequence length.
pub fn fill_missing_buckets<B, F>(
    actual_buckets: &[B],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bucket_type: BucketType,
    make_empty: F,
) -> Vec<B>
where
    B: BucketRecord + Clone,
    F: Fn(DateTime<Utc>) -> B,
{
    let expected = generate_bucket_timestamps(start, end, bucket_type);

    let mut by_instant: HashMap<i64, &B> = HashMap::with_capacity(actual_buckets.len());
    for bucket in actual_buckets {
        if let Ok(ts) = DateTime::parse_from_rfc3339(bucket.bucket_start()) {
            by_instant.entry(ts.timestamp_millis()).or_insert(bucket);
        }
    }

    expected
        .into_iter()
        .map(|ts| match by_instant.get(&ts.timestamp_millis()) {
            Some(bucket) => (*bucket).clone(),
            None => make_empty(ts),
        })
        .collect()
}
