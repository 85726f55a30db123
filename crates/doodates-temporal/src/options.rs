//! Resolution options.
//!
//! Every field has a default, so callers (and JSON option files) only spell
//! out what they want to change.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::construct::{DayPeriod, TimeWindow};

/// Which day begins a week for whole-week computations ("semaine prochaine").
///
/// Does **not** affect named-weekday expressions like "lundi prochain".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

impl WeekStartDay {
    /// How many days `weekday` is from the week-start day.
    pub fn days_from_start(self, weekday: Weekday) -> i64 {
        match self {
            WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
            WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
        }
    }
}

/// Whether the reference date counts as the "next" occurrence of its own
/// weekday ("lundi" said on a Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodayPolicy {
    #[default]
    Include,
    Exclude,
}

/// Day boundaries of "debut", "mi" and "fin" for a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthPartBoundaries {
    /// "debut X" covers days 1 through this day.
    pub beginning_last_day: u32,
    pub middle_first_day: u32,
    pub middle_last_day: u32,
    /// "fin X" covers this many days up to and including the last day.
    pub end_days: u32,
}

impl Default for MonthPartBoundaries {
    fn default() -> Self {
        Self {
            beginning_last_day: 10,
            middle_first_day: 11,
            middle_last_day: 20,
            end_days: 10,
        }
    }
}

/// Default windows attached to day-period qualifiers without explicit times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeWindows {
    pub morning: TimeWindow,
    pub midday: TimeWindow,
    pub afternoon: TimeWindow,
    pub evening: TimeWindow,
}

impl TimeWindows {
    pub fn window(&self, period: DayPeriod) -> TimeWindow {
        match period {
            DayPeriod::Morning => self.morning,
            DayPeriod::Midday => self.midday,
            DayPeriod::Afternoon => self.afternoon,
            DayPeriod::Evening => self.evening,
        }
    }
}

impl Default for TimeWindows {
    fn default() -> Self {
        let window = |start: u32, end: u32| TimeWindow {
            start: chrono::NaiveTime::MIN + chrono::Duration::hours(start as i64),
            end: chrono::NaiveTime::MIN + chrono::Duration::hours(end as i64),
        };
        Self {
            morning: window(9, 12),
            midday: window(12, 14),
            afternoon: window(14, 18),
            evening: window(18, 21),
        }
    }
}

/// Options for [`crate::Resolver`] and [`crate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Keep dates earlier than the reference date (testing and backfill).
    pub allow_past: bool,
    pub today_policy: TodayPolicy,
    pub week_start: WeekStartDay,
    pub month_parts: MonthPartBoundaries,
    pub time_windows: TimeWindows,
    /// Length of the slot created from a single explicit time ("a 14h").
    pub default_slot_minutes: u32,
    /// How many weeks "tous les lundis" covers when no month bounds it.
    pub recurring_horizon_weeks: u32,
    /// Ranges longer than this are discarded.
    pub max_range_days: u32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            allow_past: false,
            today_policy: TodayPolicy::default(),
            week_start: WeekStartDay::default(),
            month_parts: MonthPartBoundaries::default(),
            time_windows: TimeWindows::default(),
            default_slot_minutes: 60,
            recurring_horizon_weeks: 4,
            max_range_days: 366,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let o = ResolveOptions::default();
        assert!(!o.allow_past);
        assert_eq!(o.today_policy, TodayPolicy::Include);
        assert_eq!(o.week_start, WeekStartDay::Monday);
        assert_eq!(o.month_parts.beginning_last_day, 10);
        assert_eq!(
            o.time_windows.window(DayPeriod::Afternoon),
            TimeWindow::from_hm((14, 0), (18, 0)).unwrap()
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let o: ResolveOptions =
            serde_json::from_str(r#"{"allowPast": true, "weekStart": "sunday"}"#).unwrap();
        assert!(o.allow_past);
        assert_eq!(o.week_start, WeekStartDay::Sunday);
        assert_eq!(o.recurring_horizon_weeks, 4);
    }

    #[test]
    fn test_time_windows_from_json() {
        let o: ResolveOptions = serde_json::from_str(
            r#"{"timeWindows": {"evening": {"start": "19:00", "end": "23:00"}}}"#,
        )
        .unwrap();
        assert_eq!(
            o.time_windows.evening,
            TimeWindow::from_hm((19, 0), (23, 0)).unwrap()
        );
        assert_eq!(o.time_windows.morning, TimeWindows::default().morning);
    }

    #[test]
    fn test_days_from_week_start() {
        assert_eq!(WeekStartDay::Monday.days_from_start(Weekday::Mon), 0);
        assert_eq!(WeekStartDay::Sunday.days_from_start(Weekday::Mon), 1);
        assert_eq!(WeekStartDay::Sunday.days_from_start(Weekday::Sun), 0);
    }
}
