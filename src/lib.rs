//! usage-buckets - resolve usage time ranges and build gap-free bucket
//! series for charting.
//!
//! The pipeline is a set of pure functions: resolve a period selector (or an
//! explicit `YYYY-MM-DD` pair) into a concrete range, derive a bucket
//! granularity from the range length, and merge sparse actual data into the
//! full expected bucket sequence. All day/week/month boundaries are aligned
//! in a fixed UTC+9 offset.

pub mod bucket;
pub mod fill;
pub mod range;
pub mod types;
pub mod utils;

pub use bucket::{bucket_start, generate_bucket_timestamps, next_bucket_start, select_bucket_type};
pub use fill::fill_missing_buckets;
pub use range::{anchor_offset, resolve_custom_range, resolve_period_range, RangeError};
pub use types::{BucketRecord, BucketType, Period, ResolvedRange, UsageBucket};
