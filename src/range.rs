//! Period and custom date-range resolution.
//!
//! All calendar boundaries (day/week/month starts) are aligned in a single
//! fixed civil offset of UTC+9. The offset is a process-wide constant, so the
//! instant <-> civil-time conversion is a pure arithmetic shift with no DST
//! rules involved.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use crate::types::{Period, ResolvedRange};

/// Fixed anchor offset: UTC+9 (KST).
static ANCHOR_OFFSET: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(9 * 3600).unwrap());

/// Calendar-date inputs must match this exactly; anything looser (extra
/// whitespace, time components, single-digit fields) is rejected.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// The fixed UTC+9 offset used for all boundary alignment.
pub fn anchor_offset() -> &'static FixedOffset {
    &ANCHOR_OFFSET
}

/// Errors from custom-range resolution.
///
/// This is the only validated input path in the crate; every other operation
/// is total over its documented domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The string is not a valid `YYYY-MM-DD` calendar date
    #[error("invalid date \"{0}\": expected YYYY-MM-DD")]
    MalformedDate(String),
    /// The end calendar day precedes the start calendar day
    #[error("end date {end} precedes start date {start}")]
    EndBeforeStart { start: String, end: String },
}

/// Resolve a day/week/month selector against a reference instant.
///
/// `Day` runs from anchor-timezone midnight of `now`'s calendar date through
/// `now` itself (not through end of day). `Week` and `Month` are rolling
/// windows of 7 and 30 days ending at `now`, by instant arithmetic rather
/// than calendar alignment.
///
/// Pass `None` for `now` to use the current time.
pub fn resolve_period_range(period: Period, now: Option<DateTime<Utc>>) -> ResolvedRange {
    let now = now.unwrap_or_else(Utc::now);

    let (start, range_days) = match period {
        Period::Day => {
            let local = now.with_timezone(anchor_offset());
            let midnight = ANCHOR_OFFSET
                .with_ymd_and_hms(local.year(), local.month(), local.day(), 0, 0, 0)
                .unwrap()
                .with_timezone(&Utc);
            (midnight, 1)
        }
        Period::Week => (now - Duration::days(6), 7),
        Period::Month => (now - Duration::days(29), 30),
    };

    ResolvedRange {
        start,
        end: now,
        range_days,
        start_date: anchor_date_string(start),
        end_date: anchor_date_string(now),
    }
}

/// Resolve an explicit `YYYY-MM-DD` start/end date pair.
///
/// The range is inclusive of both calendar dates, but the resolved end
/// instant is anchor-timezone midnight of the day *after* `end_date` —
/// exclusive at the instant level so that bucket generation covers the whole
/// final day. Callers relying on `end` must keep that asymmetry in mind.
///
/// The input strings are echoed back verbatim as `start_date`/`end_date`.
pub fn resolve_custom_range(start_date: &str, end_date: &str) -> Result<ResolvedRange, RangeError> {
    let start = parse_calendar_date(start_date)?;
    let end = parse_calendar_date(end_date)?;

    if end < start {
        return Err(RangeError::EndBeforeStart {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }

    let range_days = ((end - start).num_days() + 1).max(1);

    Ok(ResolvedRange {
        start: anchor_midnight(start),
        end: anchor_midnight(end + Duration::days(1)),
        range_days,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    })
}

/// Parse a strict `YYYY-MM-DD` string into a calendar date.
///
/// Zero-valued components are rejected even though they match the pattern,
/// as are impossible dates (month 13, February 30).
fn parse_calendar_date(input: &str) -> Result<NaiveDate, RangeError> {
    let malformed = || RangeError::MalformedDate(input.to_string());

    if !DATE_PATTERN.is_match(input) {
        return Err(malformed());
    }

    let mut parts = input.split('-');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
    let month: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;
    let day: u32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(malformed)?;

    if year == 0 || month == 0 || day == 0 {
        return Err(malformed());
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

/// Midnight of a calendar date in the anchor timezone, as a UTC instant.
pub(crate) fn anchor_midnight(date: NaiveDate) -> DateTime<Utc> {
    ANCHOR_OFFSET
        .with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Format an instant's calendar date in the anchor timezone as `YYYY-MM-DD`.
fn anchor_date_string(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(anchor_offset())
        .format("%Y-%m-%d")
        .to_string()
}
