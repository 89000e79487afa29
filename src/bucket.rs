//! Bucket granularity selection, boundary alignment, and timestamp
//! generation.
//!
//! Alignment works in anchor-timezone civil time: convert the instant to
//! UTC+9, truncate to the bucket granularity there, and convert back. Week
//! buckets start on Sunday at midnight; month buckets on the 1st at midnight.

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};

use crate::range::anchor_offset;
use crate::types::BucketType;

/// Pick an aggregation granularity for charting a range of `range_days`
/// days.
///
/// `Minute` and `Month` are never selected here; they exist for callers that
/// choose a granularity directly (e.g. a zoomed-in or yearly view).
pub fn select_bucket_type(range_days: i64) -> BucketType {
    if range_days <= 2 {
        BucketType::Hour
    } else if range_days <= 45 {
        BucketType::Day
    } else {
        BucketType::Week
    }
}

/// The start of the bucket containing `instant`.
///
/// Idempotent: aligning an already-aligned instant returns it unchanged.
pub fn bucket_start(instant: DateTime<Utc>, bucket_type: BucketType) -> DateTime<Utc> {
    let tz = anchor_offset();
    let local = instant.with_timezone(tz);

    let aligned = match bucket_type {
        BucketType::Minute => local.with_second(0).unwrap().with_nanosecond(0).unwrap(),
        BucketType::Hour => local
            .with_minute(0)
            .unwrap()
            .with_second(0)
            .unwrap()
            .with_nanosecond(0)
            .unwrap(),
        BucketType::Day => tz
            .with_ymd_and_hms(local.year(), local.month(), local.day(), 0, 0, 0)
            .unwrap(),
        BucketType::Week => {
            // Roll back to the most recent Sunday (Sunday = 0).
            let back = local.weekday().num_days_from_sunday() as i64;
            let sunday = local.date_naive() - Duration::days(back);
            tz.with_ymd_and_hms(sunday.year(), sunday.month(), sunday.day(), 0, 0, 0)
                .unwrap()
        }
        BucketType::Month => tz
            .with_ymd_and_hms(local.year(), local.month(), 1, 0, 0, 0)
            .unwrap(),
    };

    aligned.with_timezone(&Utc)
}

/// The bucket start following an already-aligned `bucket_start`.
///
/// Minute/hour/day/week advance by a fixed duration (a fixed offset has no
/// DST, so a civil day is always 24 hours). Month advances by calendar-field
/// arithmetic in the anchor timezone so varying month lengths are handled.
pub fn next_bucket_start(bucket_start: DateTime<Utc>, bucket_type: BucketType) -> DateTime<Utc> {
    match bucket_type {
        BucketType::Minute => bucket_start + Duration::minutes(1),
        BucketType::Hour => bucket_start + Duration::hours(1),
        BucketType::Day => bucket_start + Duration::days(1),
        BucketType::Week => bucket_start + Duration::days(7),
        BucketType::Month => {
            let tz = anchor_offset();
            let local = bucket_start.with_timezone(tz);
            let (year, month) = if local.month() == 12 {
                (local.year() + 1, 1)
            } else {
                (local.year(), local.month() + 1)
            };
            tz.with_ymd_and_hms(year, month, 1, 0, 0, 0)
                .unwrap()
                .with_timezone(&Utc)
        }
    }
}

/// All expected bucket-start instants for `[start, end]`, in chronological
/// order.
///
/// Includes every bucket whose start falls at or before `end`, beginning
/// with the bucket containing `start`. Each step strictly increases the
/// instant, so the loop terminates for any finite range.
pub fn generate_bucket_timestamps(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bucket_type: BucketType,
) -> Vec<DateTime<Utc>> {
    let mut timestamps = Vec::new();
    let mut current = bucket_start(start, bucket_type);

    while current <= end {
        timestamps.push(current);
        current = next_bucket_start(current, bucket_type);
    }

    timestamps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn bucket_type_thresholds() {
        assert_eq!(select_bucket_type(1), BucketType::Hour);
        assert_eq!(select_bucket_type(2), BucketType::Hour);
        assert_eq!(select_bucket_type(3), BucketType::Day);
        assert_eq!(select_bucket_type(45), BucketType::Day);
        assert_eq!(select_bucket_type(46), BucketType::Week);
        assert_eq!(select_bucket_type(365), BucketType::Week);
    }

    #[test]
    fn minute_and_hour_truncate_in_place() {
        let instant = utc(2024, 6, 15, 12, 34, 56);
        assert_eq!(
            bucket_start(instant, BucketType::Minute),
            utc(2024, 6, 15, 12, 34, 0)
        );
        assert_eq!(
            bucket_start(instant, BucketType::Hour),
            utc(2024, 6, 15, 12, 0, 0)
        );
    }

    #[test]
    fn day_aligns_to_anchor_midnight() {
        // 2024-06-15T12:00Z is 21:00 KST on the 15th; KST midnight of the
        // 15th is 2024-06-14T15:00Z.
        let aligned = bucket_start(utc(2024, 6, 15, 12, 0, 0), BucketType::Day);
        assert_eq!(aligned, utc(2024, 6, 14, 15, 0, 0));

        // 18:00Z is already 03:00 KST on the 16th.
        let aligned = bucket_start(utc(2024, 6, 15, 18, 0, 0), BucketType::Day);
        assert_eq!(aligned, utc(2024, 6, 15, 15, 0, 0));
    }

    #[test]
    fn week_aligns_to_sunday_anchor_midnight() {
        // 2024-06-12 is a Wednesday in KST; the most recent Sunday is
        // 2024-06-09, whose KST midnight is 2024-06-08T15:00Z.
        let aligned = bucket_start(utc(2024, 6, 12, 3, 0, 0), BucketType::Week);
        assert_eq!(aligned, utc(2024, 6, 8, 15, 0, 0));

        // A Sunday aligns to its own midnight.
        let aligned = bucket_start(utc(2024, 6, 9, 3, 0, 0), BucketType::Week);
        assert_eq!(aligned, utc(2024, 6, 8, 15, 0, 0));
    }

    #[test]
    fn month_aligns_to_first_of_month() {
        let aligned = bucket_start(utc(2024, 6, 15, 12, 0, 0), BucketType::Month);
        // KST midnight of June 1 is 2024-05-31T15:00Z.
        assert_eq!(aligned, utc(2024, 5, 31, 15, 0, 0));
    }

    #[test]
    fn alignment_is_idempotent() {
        let instant = utc(2024, 6, 15, 12, 34, 56);
        for bt in [
            BucketType::Minute,
            BucketType::Hour,
            BucketType::Day,
            BucketType::Week,
            BucketType::Month,
        ] {
            let once = bucket_start(instant, bt);
            assert_eq!(bucket_start(once, bt), once, "{bt} not idempotent");
        }
    }

    #[test]
    fn next_is_aligned_for_every_granularity() {
        let instant = utc(2024, 6, 15, 12, 34, 56);
        for bt in [
            BucketType::Minute,
            BucketType::Hour,
            BucketType::Day,
            BucketType::Week,
            BucketType::Month,
        ] {
            let aligned = bucket_start(instant, bt);
            let next = next_bucket_start(aligned, bt);
            assert!(next > aligned, "{bt} did not advance");
            assert_eq!(bucket_start(next, bt), next, "{bt} step left alignment");
        }
    }

    #[test]
    fn month_advance_handles_lengths_and_year_end() {
        // Jan 1 KST midnight -> Feb 1 KST midnight (31-day month).
        let jan = bucket_start(utc(2024, 1, 15, 0, 0, 0), BucketType::Month);
        let feb = next_bucket_start(jan, BucketType::Month);
        assert_eq!(feb, utc(2024, 1, 31, 15, 0, 0));

        // Dec -> Jan of the next year.
        let dec = bucket_start(utc(2024, 12, 15, 0, 0, 0), BucketType::Month);
        let jan_next = next_bucket_start(dec, BucketType::Month);
        assert_eq!(jan_next, utc(2024, 12, 31, 15, 0, 0));
    }

    #[test]
    fn week_range_generates_seven_day_buckets() {
        // Rolling week ending 2024-06-15T12:00Z: start = 2024-06-09T12:00Z.
        let end = utc(2024, 6, 15, 12, 0, 0);
        let start = end - Duration::days(6);
        let timestamps = generate_bucket_timestamps(start, end, BucketType::Day);

        assert_eq!(timestamps.len(), 7);
        assert_eq!(timestamps[0], utc(2024, 6, 8, 15, 0, 0));
        for pair in timestamps.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn hour_buckets_cover_a_short_range() {
        let start = utc(2024, 6, 15, 1, 30, 0);
        let end = utc(2024, 6, 15, 4, 10, 0);
        let timestamps = generate_bucket_timestamps(start, end, BucketType::Hour);
        // 01:00, 02:00, 03:00, 04:00
        assert_eq!(timestamps.len(), 4);
        assert_eq!(timestamps[0], utc(2024, 6, 15, 1, 0, 0));
        assert_eq!(timestamps[3], utc(2024, 6, 15, 4, 0, 0));
    }

    #[test]
    fn generator_includes_bucket_starting_exactly_at_end() {
        let start = utc(2024, 6, 15, 0, 0, 0);
        let end = utc(2024, 6, 15, 2, 0, 0);
        let timestamps = generate_bucket_timestamps(start, end, BucketType::Hour);
        assert_eq!(timestamps.len(), 3);
        assert_eq!(*timestamps.last().unwrap(), end);
    }

    #[test]
    fn generator_yields_single_bucket_for_point_range() {
        let instant = utc(2024, 6, 15, 12, 30, 0);
        let timestamps = generate_bucket_timestamps(instant, instant, BucketType::Day);
        assert_eq!(timestamps, vec![utc(2024, 6, 14, 15, 0, 0)]);
    }
}
