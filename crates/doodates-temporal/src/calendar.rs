//! Local calendar arithmetic.
//!
//! Everything here works on [`NaiveDate`] values: a poll date is a wall-clock
//! day in the organizer's calendar, so no conversion through UTC or epoch
//! seconds ever happens after the reference date has been fixed.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{ResolverError, Result};
use crate::options::WeekStartDay;

/// Parse a `YYYY-MM-DD` reference date.
///
/// # Errors
///
/// Returns [`ResolverError::InvalidDate`] if the string is not a valid ISO date.
pub fn parse_reference_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ResolverError::InvalidDate(format!("'{}': {}", s.trim(), e)))
}

/// The local calendar date of `now` in an IANA timezone.
///
/// The caller supplies `now` (typically `Utc::now()`), keeping this function
/// free of clock access.
///
/// # Errors
///
/// Returns [`ResolverError::InvalidTimezone`] if the name is not a valid IANA timezone.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use doodates_temporal::reference_date_in;
///
/// // 23:30 UTC on March 14 is already March 15 in Paris.
/// let now = Utc.with_ymd_and_hms(2026, 3, 14, 23, 30, 0).unwrap();
/// let today = reference_date_in("Europe/Paris", now).unwrap();
/// assert_eq!(today.to_string(), "2026-03-15");
/// ```
pub fn reference_date_in(timezone: &str, now: DateTime<Utc>) -> Result<NaiveDate> {
    let tz = parse_timezone(timezone)?;
    Ok(now.with_timezone(&tz).date_naive())
}

fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ResolverError::InvalidTimezone(format!("'{}'", s)))
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(ny, nm, 1)?.pred_opt()
}

/// First and last day of a month.
pub(crate) fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, month, 1)?,
        last_day_of_month(year, month)?,
    ))
}

/// Shift a (year, month) pair by `n` months.
pub(crate) fn shift_month(year: i32, month: u32, n: i64) -> (i32, u32) {
    let index = year as i64 * 12 + (month as i64 - 1) + n;
    (index.div_euclid(12) as i32, (index.rem_euclid(12) + 1) as u32)
}

/// Add `n` calendar months, clamping to the last day of the target month.
pub(crate) fn add_months(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
    if n >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

pub(crate) fn start_of_week(date: NaiveDate, week_start: WeekStartDay) -> NaiveDate {
    date - Duration::days(week_start.days_from_start(date.weekday()))
}

/// The first `weekday` on or after `from` (strictly after when `include_from`
/// is false).
pub(crate) fn next_weekday(from: NaiveDate, weekday: Weekday, include_from: bool) -> NaiveDate {
    let days_ahead = (weekday.num_days_from_monday() as i64
        - from.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let days_ahead = if days_ahead == 0 && !include_from {
        7
    } else {
        days_ahead
    };
    from + Duration::days(days_ahead)
}

/// The most recent `weekday` strictly before `from`.
pub(crate) fn previous_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let days_back = (from.weekday().num_days_from_monday() as i64
        - weekday.num_days_from_monday() as i64
        + 7)
        % 7;
    let days_back = if days_back == 0 { 7 } else { days_back };
    from - Duration::days(days_back)
}

/// Find the Nth weekday in a month. ordinal < 0 means "last" (-1), "second to last" (-2), etc.
pub(crate) fn nth_weekday_in_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    ordinal: i32,
) -> Option<NaiveDate> {
    let target = if ordinal > 0 {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let first_occurrence = next_weekday(first, weekday, true);
        first_occurrence + Duration::weeks((ordinal - 1) as i64)
    } else if ordinal < 0 {
        let last = last_day_of_month(year, month)?;
        let diff = (last.weekday().num_days_from_monday() as i64
            - weekday.num_days_from_monday() as i64
            + 7)
            % 7;
        let last_occurrence = last - Duration::days(diff);
        last_occurrence - Duration::weeks((-ordinal - 1) as i64)
    } else {
        return None;
    };
    // Verify still in the same month
    (target.month() == month && target.year() == year).then_some(target)
}

/// Year for a month (and optional day) written without one: the first year
/// whose occurrence is not before the reference date.
pub(crate) fn infer_year(month: u32, day: Option<u32>, reference: NaiveDate) -> i32 {
    let this_year = reference.year();
    let passed = match day {
        Some(day) => (month, day) < (reference.month(), reference.day()),
        None => month < reference.month(),
    };
    if passed {
        this_year + 1
    } else {
        this_year
    }
}

/// Year and month for a day number written alone ("le 31"): the reference
/// month, or the next one once the day has passed, moved forward to the
/// first month that has such a day.
pub(crate) fn month_with_day(day: u32, reference: NaiveDate) -> (i32, u32) {
    let shift = if day < reference.day() { 1 } else { 0 };
    let (year, month) = shift_month(reference.year(), reference.month(), shift);
    (0..12)
        .map(|n| shift_month(year, month, n))
        .find(|&(y, m)| last_day_of_month(y, m).is_some_and(|last| last.day() >= day))
        .unwrap_or((year, month))
}

/// Every day from `start` to `end`, inclusive.
pub(crate) fn days_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}
