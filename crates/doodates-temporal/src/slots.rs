//! Time-of-day hints and time slot grouping.
//!
//! Explicit times ("14h", "14h30", "de 9h a 12h", "18:30") win over day-period
//! qualifiers ("matin", "soir"); qualifiers map to the configured default
//! windows; no hint at all means an all-day date.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::construct::{DayPeriod, ResolvedDate, TimeWindow};
use crate::error::{ResolverError, Result};
use crate::extract::alternation;
use crate::vocabulary::Vocabulary;

const TIME: &str = r"(\d{1,2})\s*(?:h\s*(\d{2})?|:(\d{2}))\b";

/// A time window in the external output shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
    /// The dates this slot applies to; absent when it applies to all of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
}

impl TimeSlot {
    /// Parse the `HH:MM` bounds back into a window.
    pub fn window(&self) -> Option<TimeWindow> {
        Some(TimeWindow {
            start: NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?,
            end: NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?,
        })
    }
}

/// Time information found in a normalized text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TimeHints {
    pub explicit: Option<TimeWindow>,
    /// Day-period qualifiers with their byte offset, in text order.
    pub periods: Vec<(usize, DayPeriod)>,
}

#[derive(Debug)]
pub(crate) struct SlotPatterns {
    time_range: Regex,
    /// "entre 14 et 16h": the first hour borrows the second one's unit.
    bare_start_range: Regex,
    single_time: Regex,
    period: Regex,
    names: Vec<(String, DayPeriod)>,
}

impl SlotPatterns {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let periods = alternation(vocabulary.periods.iter().map(|p| p.name.as_str()));
        Ok(Self {
            time_range: compile(&format!(
                r"\b(?:de\s+|entre\s+)?{TIME}\s*(?:-|a|et|jusqu'a)\s*{TIME}"
            ))?,
            bare_start_range: compile(&format!(
                r"\b(?:de|entre)\s+(\d{{1,2}})\s*(?:-|a|et|jusqu'a)\s*{TIME}"
            ))?,
            single_time: compile(&format!(r"\b{TIME}"))?,
            period: compile(&format!(r"\b({periods})\b"))?,
            names: vocabulary
                .periods
                .iter()
                .map(|p| (p.name.clone(), p.period))
                .collect(),
        })
    }

    pub fn detect(&self, text: &str, default_slot_minutes: u32) -> TimeHints {
        let explicit = self
            .time_range
            .captures(text)
            .and_then(|caps| {
                let start = time_from(&caps, 1)?;
                let end = time_from(&caps, 4)?;
                (end > start).then_some(TimeWindow { start, end })
            })
            .or_else(|| {
                let caps = self.bare_start_range.captures(text)?;
                let start = NaiveTime::from_hms_opt(caps.get(1)?.as_str().parse().ok()?, 0, 0)?;
                let end = time_from(&caps, 2)?;
                (end > start).then_some(TimeWindow { start, end })
            })
            .or_else(|| {
                let caps = self.single_time.captures(text)?;
                let start = time_from(&caps, 1)?;
                let (end, wrapped) = start
                    .overflowing_add_signed(Duration::minutes(default_slot_minutes as i64));
                // A slot running past midnight is cut at the end of the day.
                let end = if wrapped != 0 || end <= start {
                    NaiveTime::from_hms_opt(23, 59, 0)?
                } else {
                    end
                };
                Some(TimeWindow { start, end })
            });

        let periods = self
            .period
            .find_iter(text)
            .filter_map(|m| {
                self.names
                    .iter()
                    .find(|(name, _)| name == m.as_str())
                    .map(|(_, p)| (m.start(), *p))
            })
            .collect();

        TimeHints { explicit, periods }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ResolverError::InvalidPattern(e.to_string()))
}

/// Read an hour (group `first`) and minutes (group `first + 1` or `first + 2`).
fn time_from(caps: &Captures<'_>, first: usize) -> Option<NaiveTime> {
    let hour: u32 = caps.get(first)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(first + 1)
        .or_else(|| caps.get(first + 2))
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Group resolved dates by window into output slots.
///
/// Returns an empty list when no date carries a window. When every date
/// shares the same window, a single slot without a date list is returned.
pub(crate) fn group_slots(resolved: &[ResolvedDate]) -> Vec<TimeSlot> {
    let mut by_window: BTreeMap<TimeWindow, Vec<String>> = BTreeMap::new();
    for r in resolved {
        if let Some(window) = r.window {
            by_window.entry(window).or_default().push(r.iso());
        }
    }
    if by_window.is_empty() {
        return Vec::new();
    }

    let covers_all = by_window.len() == 1 && resolved.iter().all(|r| r.window.is_some());
    let mut slots: Vec<TimeSlot> = by_window
        .into_iter()
        .map(|(window, dates)| TimeSlot {
            start: window.start.format("%H:%M").to_string(),
            end: window.end.format("%H:%M").to_string(),
            dates: (!covers_all).then_some(dates),
        })
        .collect();
    // Order slots by the first date they apply to, then by start time.
    slots.sort_by(|a, b| {
        let first = |s: &TimeSlot| s.dates.as_ref().and_then(|d| d.first().cloned());
        first(a).cmp(&first(b)).then_with(|| a.start.cmp(&b.start))
    });
    slots
}
