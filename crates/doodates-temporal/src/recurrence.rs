//! Weekday recurrence expansion.
//!
//! "Tous les samedis de mars 2026" is exactly an RFC 5545 weekly rule
//! (`FREQ=WEEKLY;BYDAY=SA`) bounded by the month, so the expansion is
//! delegated to the `rrule` crate. Results are re-filtered against the span
//! and the weekday set, since a rule's DTSTART is not guaranteed to be an
//! instance in every RRULE implementation.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rrule::RRuleSet;

use crate::error::{ResolverError, Result};

/// Days expanded per rule. `RRuleSet::all` caps a single expansion at
/// `u16::MAX` instances, so longer spans are split.
const CHUNK_DAYS: i64 = u16::MAX as i64;

/// Every date in `start..=end` whose weekday is in `weekdays`, ascending.
///
/// # Errors
///
/// Returns [`ResolverError::Recurrence`] if a rule cannot be built.
pub fn weekdays_between(
    start: NaiveDate,
    end: NaiveDate,
    weekdays: &[Weekday],
) -> Result<Vec<NaiveDate>> {
    if end < start || weekdays.is_empty() {
        return Ok(Vec::new());
    }

    let mut dates = Vec::new();
    let mut chunk_start = start;
    loop {
        let chunk_end = chunk_start
            .checked_add_signed(Duration::days(CHUNK_DAYS - 1))
            .map_or(end, |d| d.min(end));
        dates.extend(expand_chunk(chunk_start, chunk_end, weekdays)?);
        match chunk_end.succ_opt() {
            Some(next) if chunk_end < end => chunk_start = next,
            _ => break,
        }
    }
    Ok(dates)
}

fn expand_chunk(start: NaiveDate, end: NaiveDate, weekdays: &[Weekday]) -> Result<Vec<NaiveDate>> {
    let rule = format!(
        "DTSTART:{}T000000Z\nRRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}T235959Z",
        start.format("%Y%m%d"),
        byday(weekdays),
        end.format("%Y%m%d"),
    );
    let set: RRuleSet = rule
        .parse()
        .map_err(|e| ResolverError::Recurrence(format!("'{}': {}", rule, e)))?;

    // A chunk never holds more instances than days.
    let limit = u16::try_from((end - start).num_days() + 1).unwrap_or(u16::MAX);
    let mut dates: Vec<NaiveDate> = set
        .all(limit)
        .dates
        .into_iter()
        .map(|dt| dt.date_naive())
        .filter(|d| *d >= start && *d <= end && weekdays.contains(&d.weekday()))
        .collect();
    dates.sort();
    dates.dedup();
    Ok(dates)
}

fn byday(weekdays: &[Weekday]) -> String {
    let mut codes: Vec<&str> = weekdays.iter().map(|w| weekday_code(*w)).collect();
    codes.sort();
    codes.dedup();
    codes.join(",")
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}
