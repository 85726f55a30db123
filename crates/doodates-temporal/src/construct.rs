//! Data model shared by the extractors, the fallback grammar and the resolver.
//!
//! A [`ParsedConstruct`] is produced by exactly one extractor (or by the
//! fallback grammar) and is never mutated afterwards. It carries the numeric
//! fields the resolver needs; calendar validity is only checked when the
//! construct is expanded into concrete dates.

use std::ops::Range;

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

// ── Classification ──────────────────────────────────────────────────────────

/// The category of a recognized temporal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructKind {
    AbsoluteDate,
    MonthYear,
    WeekdaySet,
    RelativeOffset,
    Range,
    RecurringPattern,
}

/// Pattern extractors, listed in priority order (most specific first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractorId {
    ExplicitDate,
    MonthYear,
    WeekdaySet,
    RelativeOffset,
    Range,
}

/// Where a construct or a resolved date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Extractor(ExtractorId),
    Fallback,
    Interpreter,
}

/// Language markers detected in a temporal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMarker {
    French,
    English,
}

// ── Time of day ─────────────────────────────────────────────────────────────

/// A coarse part of the day ("matin", "soir", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayPeriod {
    Morning,
    Midday,
    Afternoon,
    Evening,
}

/// A start/end pair of wall-clock times, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window from hour/minute pairs. Returns `None` for impossible times.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            end: NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        })
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ── Construct payloads ──────────────────────────────────────────────────────

/// A day/month/year triple as written by the user. May be calendrically
/// impossible ("30 fevrier"); see [`CalendarDay::to_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl CalendarDay {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// A weekday mentioned in a weekday set, with its own optional qualifier
/// ("vendredi soir").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekdayItem {
    pub weekday: Weekday,
    pub period: Option<DayPeriod>,
}

/// How far a weekday set reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Horizon {
    /// The next occurrence of each weekday.
    NextOccurrence,
    /// The occurrence inside a given week, relative to the reference week
    /// (0 = this week, 1 = next week).
    Week(i64),
}

/// The span a recurring weekday pattern is expanded over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurrenceSpan {
    Month { month: u32, year: i32 },
    /// The configured default horizon, counted from the reference date.
    DefaultHorizon,
}

/// Which part of a month "debut"/"mi"/"fin" refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthPart {
    Beginning,
    Middle,
    End,
}

/// A signed offset from the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeOffset {
    /// A single day `n` days away.
    Days(i64),
    /// A single day `n` weeks away.
    Weeks(i64),
    /// A single day `n` calendar months away (clamped to month end).
    Months(i64),
    /// Every day of the week `n` weeks away from the reference week.
    Week(i64),
    /// Every day of the month `n` months away from the reference month.
    Month(i64),
    /// Saturday and Sunday of the week `n` weeks away.
    Weekend(i64),
    /// Part of a named month.
    MonthPart { part: MonthPart, month: u32, year: i32 },
}

/// One end of a date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeBound {
    Day(CalendarDay),
    /// The next occurrence of a weekday.
    Weekday(Weekday),
    /// A weekday inside a week relative to the reference week
    /// ("du lundi au vendredi de la semaine prochaine").
    WeekdayInWeek(Weekday, i64),
}

/// The payload of a recognized construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum Construct {
    /// One or more explicit days ("12 mars 2026", "12, 13 et 14 mars").
    Absolute { days: Vec<CalendarDay> },
    /// The n-th weekday of a month ("premier lundi de mars"); negative
    /// ordinals count from the end of the month.
    NthWeekday {
        ordinal: i32,
        weekday: Weekday,
        month: u32,
        year: i32,
    },
    /// A whole month ("mars 2026").
    MonthYear { month: u32, year: i32 },
    /// Weekdays repeated over a span ("tous les samedis de mars 2026").
    Recurring {
        weekdays: Vec<Weekday>,
        span: RecurrenceSpan,
    },
    /// A set of weekdays ("lundi ou mardi", "vendredi soir ou samedi matin").
    Weekdays {
        items: Vec<WeekdayItem>,
        horizon: Horizon,
        /// Skip the reference date even when it matches ("lundi prochain").
        strictly_future: bool,
    },
    Relative { offset: RelativeOffset },
    /// An inclusive range, optionally narrowed to some weekdays.
    Range {
        start: RangeBound,
        end: RangeBound,
        weekdays: Vec<Weekday>,
    },
}

impl Construct {
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::Absolute { .. } | Construct::NthWeekday { .. } => {
                ConstructKind::AbsoluteDate
            }
            Construct::MonthYear { .. } => ConstructKind::MonthYear,
            Construct::Recurring { .. } => ConstructKind::RecurringPattern,
            Construct::Weekdays { .. } => ConstructKind::WeekdaySet,
            Construct::Relative { .. } => ConstructKind::RelativeOffset,
            Construct::Range { .. } => ConstructKind::Range,
        }
    }
}

/// The outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedConstruct {
    pub construct: Construct,
    pub origin: Origin,
    /// Byte span in the text the construct was matched against.
    pub span: Range<usize>,
}

impl ParsedConstruct {
    pub fn new(construct: Construct, origin: Origin, span: Range<usize>) -> Self {
        Self {
            construct,
            origin,
            span,
        }
    }

    pub fn kind(&self) -> ConstructKind {
        self.construct.kind()
    }
}

/// The raw part of the user's input believed to denote a date construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemporalExpression {
    pub raw: String,
    /// Byte offsets into the source string. Absent for fallback matches,
    /// whose text was rewritten by translation.
    pub span: Option<Range<usize>>,
    pub markers: Vec<LanguageMarker>,
}

/// A concrete calendar date with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDate {
    /// Serialized as ISO 8601 `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Absent for dates proposed by an interpreter.
    pub kind: Option<ConstructKind>,
    pub origin: Origin,
    pub window: Option<TimeWindow>,
}

impl ResolvedDate {
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_day_rejects_impossible_dates() {
        assert!(CalendarDay::new(30, 2, 2026).to_date().is_none());
        assert!(CalendarDay::new(29, 2, 2028).to_date().is_some());
    }

    #[test]
    fn test_time_window_serializes_as_hhmm() {
        let window = TimeWindow::from_hm((9, 0), (12, 30)).unwrap();
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"start":"09:00","end":"12:30"}"#);
        let back: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(back, window);
    }

    #[test]
    fn test_kind_of_nth_weekday_is_absolute() {
        let c = Construct::NthWeekday {
            ordinal: 1,
            weekday: Weekday::Mon,
            month: 3,
            year: 2026,
        };
        assert_eq!(c.kind(), ConstructKind::AbsoluteDate);
    }
}
