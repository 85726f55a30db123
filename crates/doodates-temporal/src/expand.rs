//! Expansion of a construct into concrete calendar dates.
//!
//! All arithmetic happens on [`NaiveDate`] in the local calendar. Impossible
//! days are skipped silently; past filtering, windows and ordering are left
//! to the resolver.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::{debug, warn};

use crate::calendar::{
    add_months, days_inclusive, month_bounds, next_weekday, nth_weekday_in_month, shift_month,
    start_of_week,
};
use crate::construct::{
    Construct, DayPeriod, Horizon, MonthPart, RangeBound, RecurrenceSpan, RelativeOffset,
};
use crate::options::{ResolveOptions, TodayPolicy, WeekStartDay};
use crate::recurrence::weekdays_between;

/// One expanded date, with the day period its own item carried, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Occurrence {
    pub date: NaiveDate,
    pub period: Option<DayPeriod>,
}

impl Occurrence {
    fn plain(date: NaiveDate) -> Self {
        Self { date, period: None }
    }
}

/// Expand a construct relative to the reference date.
pub(crate) fn expand(
    construct: &Construct,
    reference: NaiveDate,
    options: &ResolveOptions,
) -> Vec<Occurrence> {
    let dates: Vec<NaiveDate> = match construct {
        Construct::Absolute { days } => days.iter().filter_map(|d| d.to_date()).collect(),
        Construct::NthWeekday {
            ordinal,
            weekday,
            month,
            year,
        } => nth_weekday_in_month(*year, *month, *weekday, *ordinal)
            .into_iter()
            .collect(),
        Construct::MonthYear { month, year } => whole_month(*year, *month),
        Construct::Recurring { weekdays, span } => {
            let bounds = match span {
                RecurrenceSpan::Month { month, year } => month_bounds(*year, *month),
                RecurrenceSpan::DefaultHorizon => {
                    let days = i64::from(options.recurring_horizon_weeks) * 7;
                    shift_days(reference, days - 1).map(|end| (reference, end))
                }
            };
            match bounds {
                Some((start, end)) => recurring(start, end, weekdays),
                None => Vec::new(),
            }
        }
        Construct::Weekdays {
            items,
            horizon,
            strictly_future,
        } => {
            // A qualifier on the last item only ("lundi ou mardi soir") covers them all.
            let shared = match items.split_last() {
                Some((last, rest)) if rest.iter().all(|i| i.period.is_none()) => last.period,
                _ => None,
            };
            return items
                .iter()
                .map(|item| Occurrence {
                    date: weekday_in_horizon(
                        item.weekday,
                        *horizon,
                        *strictly_future,
                        reference,
                        options,
                    ),
                    period: item.period.or(shared),
                })
                .collect();
        }
        Construct::Relative { offset } => relative(*offset, reference, options),
        Construct::Range {
            start,
            end,
            weekdays,
        } => range(*start, *end, weekdays, reference, options),
    };
    dates.into_iter().map(Occurrence::plain).collect()
}

fn whole_month(year: i32, month: u32) -> Vec<NaiveDate> {
    month_bounds(year, month)
        .map(|(first, last)| days_inclusive(first, last))
        .unwrap_or_default()
}

fn recurring(start: NaiveDate, end: NaiveDate, weekdays: &[Weekday]) -> Vec<NaiveDate> {
    weekdays_between(start, end, weekdays).unwrap_or_else(|e| {
        warn!(error = %e, %start, %end, "discarding recurrence expansion");
        Vec::new()
    })
}

fn weekday_in_horizon(
    weekday: Weekday,
    horizon: Horizon,
    strictly_future: bool,
    reference: NaiveDate,
    options: &ResolveOptions,
) -> NaiveDate {
    match horizon {
        Horizon::NextOccurrence => {
            let include_today = !strictly_future && options.today_policy == TodayPolicy::Include;
            next_weekday(reference, weekday, include_today)
        }
        Horizon::Week(n) => weekday_in_week(reference, weekday, n, options.week_start),
    }
}

/// `weekday` in the week `n` weeks after the one containing `reference`.
fn weekday_in_week(
    reference: NaiveDate,
    weekday: Weekday,
    n: i64,
    week_start: WeekStartDay,
) -> NaiveDate {
    start_of_week(reference, week_start)
        + Duration::weeks(n)
        + Duration::days(week_start.days_from_start(weekday))
}

fn relative(
    offset: RelativeOffset,
    reference: NaiveDate,
    options: &ResolveOptions,
) -> Vec<NaiveDate> {
    match offset {
        RelativeOffset::Days(n) => shift_days(reference, n).into_iter().collect(),
        RelativeOffset::Weeks(n) => n
            .checked_mul(7)
            .and_then(|days| shift_days(reference, days))
            .into_iter()
            .collect(),
        RelativeOffset::Months(n) => add_months(reference, n).into_iter().collect(),
        RelativeOffset::Week(n) => {
            let start = start_of_week(reference, options.week_start) + Duration::weeks(n);
            days_inclusive(start, start + Duration::days(6))
        }
        RelativeOffset::Month(n) => {
            let (year, month) = shift_month(reference.year(), reference.month(), n);
            whole_month(year, month)
        }
        RelativeOffset::Weekend(n) => {
            let saturday = start_of_week(reference, WeekStartDay::Monday)
                + Duration::weeks(n)
                + Duration::days(5);
            vec![saturday, saturday + Duration::days(1)]
        }
        RelativeOffset::MonthPart { part, month, year } => {
            let Some((first, last)) = month_bounds(year, month) else {
                return Vec::new();
            };
            let bounds = &options.month_parts;
            // Boundaries beyond the calendar clamp to the month.
            let day = |n: u32| shift_days(first, i64::from(n) - 1).unwrap_or(NaiveDate::MAX);
            let (start, end) = match part {
                MonthPart::Beginning => (first, day(bounds.beginning_last_day)),
                MonthPart::Middle => (day(bounds.middle_first_day), day(bounds.middle_last_day)),
                MonthPart::End => (
                    shift_days(last, 1 - i64::from(bounds.end_days)).unwrap_or(NaiveDate::MIN),
                    last,
                ),
            };
            days_inclusive(start.max(first), end.min(last))
        }
    }
}

fn shift_days(from: NaiveDate, n: i64) -> Option<NaiveDate> {
    from.checked_add_signed(Duration::try_days(n)?)
}

fn range(
    start: RangeBound,
    end: RangeBound,
    weekdays: &[Weekday],
    reference: NaiveDate,
    options: &ResolveOptions,
) -> Vec<NaiveDate> {
    let include_today = options.today_policy == TodayPolicy::Include;
    let Some(first) = bound_date(start, reference, include_today, options.week_start) else {
        return Vec::new();
    };
    let Some(last) = bound_date(end, first, true, options.week_start) else {
        return Vec::new();
    };
    if last < first {
        debug!(%first, %last, "inverted range");
        return Vec::new();
    }
    let span = (last - first).num_days() + 1;
    if span > i64::from(options.max_range_days) {
        debug!(span, max = options.max_range_days, "range too long");
        return Vec::new();
    }

    if weekdays.is_empty() {
        days_inclusive(first, last)
    } else {
        recurring(first, last, weekdays)
    }
}

fn bound_date(
    bound: RangeBound,
    from: NaiveDate,
    include_from: bool,
    week_start: WeekStartDay,
) -> Option<NaiveDate> {
    match bound {
        RangeBound::Day(day) => day.to_date(),
        RangeBound::Weekday(weekday) => Some(next_weekday(from, weekday, include_from)),
        RangeBound::WeekdayInWeek(weekday, n) => {
            Some(weekday_in_week(from, weekday, n, week_start))
        }
    }
}
