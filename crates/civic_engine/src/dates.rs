use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use civic_core::Clock;

use crate::text::clean;
use crate::UnparsableFragmentError;

// Two-digit years first: `%Y` would happily read "19" as year 19.
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y"];

/// Interpret a portal date string as a civic-local instant.
///
/// Date-only strings mean local midnight. A bare `m/d` takes its year from
/// `clock`, read in the civic timezone. DST-ambiguous times resolve to the
/// earlier instant; times skipped by DST are rejected.
pub(crate) fn parse_civic_datetime(
    raw: &str,
    timezone: Tz,
    clock: &dyn Clock,
) -> Result<DateTime<Tz>, UnparsableFragmentError> {
    let cleaned = clean(raw);
    let invalid = || UnparsableFragmentError::InvalidDate(cleaned.clone());

    let naive = parse_naive(&cleaned)
        .or_else(|| {
            let this_year = clock.now().with_timezone(&timezone).year();
            parse_month_day(&cleaned, this_year)
        })
        .ok_or_else(invalid)?;

    timezone
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(invalid)
}

fn parse_naive(cleaned: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn parse_month_day(cleaned: &str, year: i32) -> Option<NaiveDateTime> {
    let (month, day) = cleaned.split_once('/')?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(NaiveTime::MIN))
}
