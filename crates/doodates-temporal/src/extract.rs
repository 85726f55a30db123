//! Pattern extractors.
//!
//! A single ordered table of `(ExtractorId, fn)` pairs, most specific first.
//! Each extractor looks at the whole normalized text and returns its
//! earliest-starting (then longest) match, or nothing. The first extractor
//! with a match wins; a lower-priority match only replaces it when its span
//! strictly encloses the winner's span, which happens when the same
//! expression is read more completely ("du 15 au 20 mars 2026" encloses
//! "20 mars 2026").
//!
//! All patterns are compiled once per [`Vocabulary`] with the `regex` crate,
//! which matches in linear time.

use std::ops::Range;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use regex::{Captures, Regex};
use tracing::debug;

use crate::calendar::{infer_year, month_with_day, shift_month};
use crate::construct::{
    CalendarDay, Construct, ExtractorId, Horizon, MonthPart, Origin, ParsedConstruct, RangeBound,
    RecurrenceSpan, RelativeOffset, WeekdayItem,
};
use crate::error::{ResolverError, Result};
use crate::vocabulary::Vocabulary;

/// A construct and its byte span in the normalized text.
type Found = (Construct, Range<usize>);

type Extractor = fn(&ExtractorTable, &str, NaiveDate) -> Option<Found>;

const EXTRACTORS: [(ExtractorId, Extractor); 5] = [
    (ExtractorId::ExplicitDate, explicit_date),
    (ExtractorId::MonthYear, month_year),
    (ExtractorId::WeekdaySet, weekday_set),
    (ExtractorId::RelativeOffset, relative_offset),
    (ExtractorId::Range, range),
];

/// Words that turn a following weekday into an ordinal construct
/// ("premier lundi de mars"), which the extractors leave to the fallback.
const ORDINAL_WORDS: &[&str] = &[
    "premier",
    "premiere",
    "1",
    "2",
    "3",
    "4",
    "5",
    "deuxieme",
    "second",
    "seconde",
    "troisieme",
    "quatrieme",
    "cinquieme",
    "dernier",
    "derniere",
    "avant-dernier",
];

/// Compiled extractor patterns for one vocabulary.
#[derive(Debug)]
pub(crate) struct ExtractorTable {
    vocabulary: Vocabulary,
    // ExplicitDate
    listed_days: Regex,
    numeric_date: Regex,
    iso_date: Regex,
    // MonthYear
    recurring_month: Regex,
    month_with_year: Regex,
    ordinal_weekday_of: Regex,
    // WeekdaySet
    weekday_set: Regex,
    weekday_item: Regex,
    // RelativeOffset
    day_word: Regex,
    next_or_last: Regex,
    current_period: Regex,
    weekend: Regex,
    offset: Regex,
    month_part: Regex,
    current_month_part: Regex,
    // Range
    day_range: Regex,
    weekday_range: Regex,
}

impl ExtractorTable {
    /// Compile the extractor patterns for a vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidVocabulary`] if the vocabulary fails
    /// validation, or [`ResolverError::InvalidPattern`] if a pattern built
    /// from it does not compile.
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        vocabulary.validate()?;

        let wd = format!(
            r"(?:{})s?\b",
            alternation(vocabulary.weekdays.iter().map(|w| w.name.as_str()))
        );
        let wd_list = format!(r"{wd}(?:\s*(?:,|et|ou)\s*{wd})*");
        let month = format!(
            r"(?:{})",
            alternation(vocabulary.months.iter().map(|m| m.name.as_str()))
        );
        let period = format!(
            r"(?:{})",
            alternation(vocabulary.periods.iter().map(|p| p.name.as_str()))
        );
        let item = format!(r"{wd}(?:\s+{period}\b)?(?:\s+prochaine?\b)?");
        let endpoint =
            format!(r"(?:le\s+)?(?:{wd}\s+)?(\d{{1,2}})\b(?:\s+({month})\b\.?(?:\s+(\d{{4}})\b)?)?");

        Ok(Self {
            vocabulary: vocabulary.clone(),
            listed_days: compile(&format!(
                r"\b(?:{wd}\s+)?(?:le\s+)?((?:\d{{1,2}}\s*(?:,|et|ou)\s*(?:le\s+)?(?:{wd}\s+)?)*\d{{1,2}})\s+({month})\b\.?(?:\s+(\d{{4}})\b)?"
            ))?,
            numeric_date: compile(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{4}|\d{2}))?\b")?,
            iso_date: compile(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b")?,
            recurring_month: compile(&format!(
                r"\b(?:tous\s+les|toutes\s+les|chaque|les)\s+({wd_list})\s+(?:du\s+mois\s+de\s+|du\s+mois\s+d'|de\s+|d'|en\s+)({month})\b\.?(?:\s+(\d{{4}})\b)?"
            ))?,
            month_with_year: compile(&format!(r"\b({month})\b\.?\s+(\d{{4}})\b"))?,
            ordinal_weekday_of: compile(&format!(
                r"\b(?:{})\s+{wd}\s+(?:du\s+mois\s+)?(?:de\s+|d'\s*|en\s+)$",
                alternation(ORDINAL_WORDS.iter().copied())
            ))?,
            weekday_set: compile(&format!(
                r"\b(?:(tous\s+les|toutes\s+les|chaque|les|le|ce)\s+)?{item}(?:\s*(?:,|et|ou)\s*(?:le\s+)?{item})*(?:\s+(?:de\s+)?(?:la\s+)?(semaine\s+prochaine|cette\s+semaine)\b)?"
            ))?,
            weekday_item: compile(&format!(r"\b({wd})(?:\s+({period})\b)?"))?,
            day_word: compile(
                r"\b(aujourdhui|apres-demain|demain|avant-hier|hier|ce\s+soir|ce\s+matin|cet\s+apres-midi)\b",
            )?,
            next_or_last: compile(
                r"\b(?:la\s+|le\s+)?(semaine|mois)\s+(prochaine?|derniere?|passee?)\b",
            )?,
            current_period: compile(r"\b(cette\s+semaine|ce\s+mois(?:-ci)?)\b")?,
            weekend: compile(r"\b(?:ce\s+|le\s+)?weekend(?:\s+(prochain))?\b")?,
            offset: compile(r"\b(dans|il\s+y\s+a)\s+(\d{1,3})\s+(jours?|semaines?|mois)\b")?,
            month_part: compile(&format!(
                r"\b(debut|fin|milieu|mi)(?:\s+|-)({month})\b\.?(?:\s+(\d{{4}})\b)?"
            ))?,
            current_month_part: compile(
                r"\b(debut|fin|milieu|mi)(?:\s+|-)(?:du\s+)?mois(?:\s+(prochain))?\b",
            )?,
            day_range: compile(&format!(
                r"\b(?:(?:tous\s+|toutes\s+)?les\s+({wd_list})\s+)?(?:du|entre)\s+{endpoint}(?:\s+(?:au|a|et)\s+|\s*-\s*){endpoint}"
            ))?,
            weekday_range: compile(&format!(
                r"\b(?:du|de|entre)\s+(?:le\s+)?({wd})\s+(?:au|a|et)\s+(?:le\s+)?({wd})(?:\s+(?:de\s+)?(?:la\s+)?(semaine\s+prochaine|cette\s+semaine)\b)?"
            ))?,
        })
    }

    /// Run the extractors in priority order over normalized text.
    pub fn extract(&self, text: &str, reference: NaiveDate) -> Option<ParsedConstruct> {
        let mut winner: Option<ParsedConstruct> = None;
        for (id, extractor) in EXTRACTORS {
            let Some((construct, span)) = extractor(self, text, reference) else {
                continue;
            };
            let replaced = match &winner {
                None => None,
                Some(current) if encloses(&span, &current.span) => Some(current.origin),
                Some(_) => continue,
            };
            match replaced {
                None => debug!(extractor = ?id, ?span, "extractor matched"),
                Some(origin) => debug!(
                    extractor = ?id,
                    ?span,
                    replaced = ?origin,
                    "enclosing match replaces earlier extractor"
                ),
            }
            winner = Some(ParsedConstruct::new(construct, Origin::Extractor(id), span));
        }
        winner
    }

    /// Run a single extractor.
    #[cfg(test)]
    pub fn run(&self, id: ExtractorId, text: &str, reference: NaiveDate) -> Option<ParsedConstruct> {
        let (_, extractor) = EXTRACTORS.iter().find(|(candidate, _)| *candidate == id)?;
        extractor(self, text, reference)
            .map(|(construct, span)| ParsedConstruct::new(construct, Origin::Extractor(id), span))
    }

    fn weekdays_in(&self, text: &str) -> Vec<Weekday> {
        let mut weekdays: Vec<Weekday> = Vec::new();
        for caps in self.weekday_item.captures_iter(text) {
            if let Some(weekday) = caps.get(1).and_then(|m| self.vocabulary.weekday(m.as_str())) {
                if !weekdays.contains(&weekday) {
                    weekdays.push(weekday);
                }
            }
        }
        weekdays
    }

    fn month_at(&self, caps: &Captures<'_>, group: usize) -> Option<u32> {
        caps.get(group)
            .and_then(|m| self.vocabulary.month(m.as_str()))
    }
}

/// Regex alternation of literal words, longest first so that a word never
/// shadows a longer word it prefixes ("fev" vs "fevrier").
pub(crate) fn alternation<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut words: Vec<&str> = words.into_iter().collect();
    words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    words.dedup();
    words
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ResolverError::InvalidPattern(e.to_string()))
}

fn encloses(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && outer.end >= inner.end && outer != inner
}

/// Keep the earliest-starting candidate; on ties, the longest one.
fn earliest_longest(candidates: impl IntoIterator<Item = Option<Found>>) -> Option<Found> {
    candidates.into_iter().flatten().fold(None, |best, found| match best {
        Some(b) if (b.1.start, std::cmp::Reverse(b.1.len()))
            <= (found.1.start, std::cmp::Reverse(found.1.len())) =>
        {
            Some(b)
        }
        _ => Some(found),
    })
}

fn number<T: FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

// ── 1. Explicit dates ───────────────────────────────────────────────────────

fn explicit_date(t: &ExtractorTable, text: &str, reference: NaiveDate) -> Option<Found> {
    let listed = t.listed_days.captures(text).and_then(|caps| {
        let month = t.month_at(&caps, 2)?;
        let days: Vec<u32> = caps
            .get(1)?
            .as_str()
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|d| d.parse().ok())
            .collect();
        let year = number(&caps, 3)
            .unwrap_or_else(|| infer_year(month, days.iter().max().copied(), reference));
        let days = days
            .into_iter()
            .map(|day| CalendarDay::new(day, month, year))
            .collect();
        Some((Construct::Absolute { days }, caps.get(0)?.range()))
    });

    let numeric = t.numeric_date.captures(text).and_then(|caps| {
        let day: u32 = number(&caps, 1)?;
        let month: u32 = number(&caps, 2)?;
        let year = match caps.get(3).map(|m| m.as_str()) {
            Some(y) if y.len() == 2 => 2000 + y.parse::<i32>().ok()?,
            Some(y) => y.parse().ok()?,
            None => infer_year(month, Some(day), reference),
        };
        let days = vec![CalendarDay::new(day, month, year)];
        Some((Construct::Absolute { days }, caps.get(0)?.range()))
    });

    let iso = t.iso_date.captures(text).and_then(|caps| {
        let days = vec![CalendarDay::new(
            number(&caps, 3)?,
            number(&caps, 2)?,
            number(&caps, 1)?,
        )];
        Some((Construct::Absolute { days }, caps.get(0)?.range()))
    });

    earliest_longest([listed, numeric, iso])
}

// ── 2. Month and year ───────────────────────────────────────────────────────

fn month_year(t: &ExtractorTable, text: &str, reference: NaiveDate) -> Option<Found> {
    let recurring = t.recurring_month.captures(text).and_then(|caps| {
        let weekdays = t.weekdays_in(caps.get(1)?.as_str());
        let month = t.month_at(&caps, 2)?;
        let year = number(&caps, 3).unwrap_or_else(|| infer_year(month, None, reference));
        let construct = Construct::Recurring {
            weekdays,
            span: RecurrenceSpan::Month { month, year },
        };
        Some((construct, caps.get(0)?.range()))
    });

    // "premier lundi de mars 2026" names one day, not the month.
    let whole = t.month_with_year.captures_iter(text).find_map(|caps| {
        let m = caps.get(0)?;
        if t.ordinal_weekday_of.is_match(&text[..m.start()]) {
            return None;
        }
        let construct = Construct::MonthYear {
            month: t.month_at(&caps, 1)?,
            year: number(&caps, 2)?,
        };
        Some((construct, m.range()))
    });

    earliest_longest([recurring, whole])
}

// ── 3. Weekday sets ─────────────────────────────────────────────────────────

fn weekday_set(t: &ExtractorTable, text: &str, _reference: NaiveDate) -> Option<Found> {
    t.weekday_set.captures_iter(text).find_map(|caps| {
        let m = caps.get(0)?;
        if follows_ordinal(text, m.start()) || text[m.end()..].trim_start().starts_with("dernier")
        {
            return None;
        }

        let prefix = caps.get(1).map(|p| p.as_str());
        let mut items: Vec<WeekdayItem> = Vec::new();
        let mut plural = false;
        for item in t.weekday_item.captures_iter(m.as_str()) {
            let name = item.get(1)?.as_str();
            let weekday = t.vocabulary.weekday(name)?;
            plural |= name.ends_with('s')
                && t.vocabulary.weekday(name.trim_end_matches('s')).is_some();
            let period = item
                .get(2)
                .and_then(|p| t.vocabulary.period(p.as_str()));
            items.push(WeekdayItem { weekday, period });
        }
        if items.is_empty() {
            return None;
        }

        let every = plural
            || prefix.is_some_and(|p| {
                p.starts_with("tous") || p.starts_with("toutes") || p == "chaque" || p == "les"
            });
        let construct = if every {
            let mut weekdays: Vec<Weekday> = Vec::new();
            for item in &items {
                if !weekdays.contains(&item.weekday) {
                    weekdays.push(item.weekday);
                }
            }
            Construct::Recurring {
                weekdays,
                span: RecurrenceSpan::DefaultHorizon,
            }
        } else {
            let horizon = match caps.get(2).map(|h| h.as_str()) {
                Some(h) if h.ends_with("prochaine") => Horizon::Week(1),
                Some(_) => Horizon::Week(0),
                None => Horizon::NextOccurrence,
            };
            Construct::Weekdays {
                items,
                horizon,
                strictly_future: m.as_str().contains("prochain") && caps.get(2).is_none(),
            }
        };
        Some((construct, m.range()))
    })
}

fn follows_ordinal(text: &str, start: usize) -> bool {
    text[..start]
        .split_whitespace()
        .next_back()
        .is_some_and(|word| ORDINAL_WORDS.contains(&word))
}

// ── 4. Relative offsets ─────────────────────────────────────────────────────

fn relative_offset(t: &ExtractorTable, text: &str, reference: NaiveDate) -> Option<Found> {
    let relative = |offset: RelativeOffset, span: Range<usize>| {
        Some((Construct::Relative { offset }, span))
    };

    let day_word = t.day_word.captures(text).and_then(|caps| {
        let word = caps.get(1)?.as_str();
        let days = match word {
            "apres-demain" => 2,
            "demain" => 1,
            "hier" => -1,
            "avant-hier" => -2,
            _ => 0,
        };
        relative(RelativeOffset::Days(days), caps.get(0)?.range())
    });

    let next_or_last = t.next_or_last.captures(text).and_then(|caps| {
        let n = if caps.get(2)?.as_str().starts_with("prochain") {
            1
        } else {
            -1
        };
        let offset = match caps.get(1)?.as_str() {
            "semaine" => RelativeOffset::Week(n),
            _ => RelativeOffset::Month(n),
        };
        relative(offset, caps.get(0)?.range())
    });

    let current = t.current_period.captures(text).and_then(|caps| {
        let offset = if caps.get(1)?.as_str().starts_with("cette") {
            RelativeOffset::Week(0)
        } else {
            RelativeOffset::Month(0)
        };
        relative(offset, caps.get(0)?.range())
    });

    let weekend = t.weekend.captures(text).and_then(|caps| {
        let n = if caps.get(1).is_some() { 1 } else { 0 };
        relative(RelativeOffset::Weekend(n), caps.get(0)?.range())
    });

    let offset = t.offset.captures(text).and_then(|caps| {
        let sign = if caps.get(1)?.as_str() == "dans" { 1 } else { -1 };
        let n: i64 = number(&caps, 2)?;
        let offset = match caps.get(3)?.as_str() {
            "jour" | "jours" => RelativeOffset::Days(sign * n),
            "semaine" | "semaines" => RelativeOffset::Weeks(sign * n),
            _ => RelativeOffset::Months(sign * n),
        };
        relative(offset, caps.get(0)?.range())
    });

    let named_month_part = t.month_part.captures(text).and_then(|caps| {
        let part = month_part(caps.get(1)?.as_str());
        let month = t.month_at(&caps, 2)?;
        // A part that is already over points at next year's month.
        let last_day = match part {
            MonthPart::Beginning => 10,
            MonthPart::Middle => 20,
            MonthPart::End => 31,
        };
        let year = number(&caps, 3).unwrap_or_else(|| infer_year(month, Some(last_day), reference));
        relative(
            RelativeOffset::MonthPart { part, month, year },
            caps.get(0)?.range(),
        )
    });

    let current_month_part = t.current_month_part.captures(text).and_then(|caps| {
        let part = month_part(caps.get(1)?.as_str());
        let n = if caps.get(2).is_some() { 1 } else { 0 };
        let (year, month) = shift_month(reference.year(), reference.month(), n);
        relative(
            RelativeOffset::MonthPart { part, month, year },
            caps.get(0)?.range(),
        )
    });

    earliest_longest([
        day_word,
        next_or_last,
        current,
        weekend,
        offset,
        named_month_part,
        current_month_part,
    ])
}

fn month_part(word: &str) -> MonthPart {
    match word {
        "debut" => MonthPart::Beginning,
        "fin" => MonthPart::End,
        _ => MonthPart::Middle,
    }
}

// ── 5. Ranges ───────────────────────────────────────────────────────────────

fn range(t: &ExtractorTable, text: &str, reference: NaiveDate) -> Option<Found> {
    let days = t.day_range.captures(text).and_then(|caps| {
        let weekdays = caps
            .get(1)
            .map(|list| t.weekdays_in(list.as_str()))
            .unwrap_or_default();
        let (start, end) = range_days(t, &caps, reference)?;
        let construct = Construct::Range {
            start: RangeBound::Day(start),
            end: RangeBound::Day(end),
            weekdays,
        };
        Some((construct, caps.get(0)?.range()))
    });

    let weekdays = t.weekday_range.captures(text).and_then(|caps| {
        let first = t.vocabulary.weekday(caps.get(1)?.as_str())?;
        let start = match caps.get(3).map(|w| w.as_str()) {
            Some(w) if w.ends_with("prochaine") => RangeBound::WeekdayInWeek(first, 1),
            Some(_) => RangeBound::WeekdayInWeek(first, 0),
            None => RangeBound::Weekday(first),
        };
        let construct = Construct::Range {
            start,
            end: RangeBound::Weekday(t.vocabulary.weekday(caps.get(2)?.as_str())?),
            weekdays: Vec::new(),
        };
        Some((construct, caps.get(0)?.range()))
    });

    earliest_longest([days, weekdays])
}

/// Fill in the months and years a day range leaves out.
///
/// Groups: 2-4 start day/month/year, 5-7 end day/month/year. The end is
/// anchored first (explicit month, else the start's month, else the next
/// month holding the end day); the start then defaults to the end's month, stepping back
/// one month when its day is after the end day ("du 28 au 3").
fn range_days(
    t: &ExtractorTable,
    caps: &Captures<'_>,
    reference: NaiveDate,
) -> Option<(CalendarDay, CalendarDay)> {
    let start_day: u32 = number(caps, 2)?;
    let end_day: u32 = number(caps, 5)?;
    let start_month = t.month_at(caps, 3);
    let end_month = t.month_at(caps, 6);
    let explicit_year: Option<i32> = number(caps, 7).or_else(|| number(caps, 4));

    let (end_year, end_month) = match (end_month, start_month) {
        (Some(month), _) => (
            explicit_year.unwrap_or_else(|| infer_year(month, Some(end_day), reference)),
            month,
        ),
        (None, Some(month)) => {
            let year = explicit_year.unwrap_or_else(|| infer_year(month, Some(start_day), reference));
            if end_day < start_day {
                shift_month(year, month, 1)
            } else {
                (year, month)
            }
        }
        (None, None) => month_with_day(end_day, reference),
    };

    let (start_year, start_month) = match start_month {
        Some(month) => {
            let year = number(caps, 4).unwrap_or(if (month, start_day) > (end_month, end_day) {
                end_year - 1
            } else {
                end_year
            });
            (year, month)
        }
        None if start_day > end_day => shift_month(end_year, end_month, -1),
        None => (end_year, end_month),
    };

    Some((
        CalendarDay::new(start_day, start_month, start_year),
        CalendarDay::new(end_day, end_month, end_year),
    ))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_str;

    fn table() -> ExtractorTable {
        ExtractorTable::new(&Vocabulary::french()).unwrap()
    }

    fn reference() -> NaiveDate {
        // Monday, June 2, 2025
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn extract(text: &str) -> Option<ParsedConstruct> {
        let norm = normalize_str(text, &Vocabulary::french());
        table().extract(&norm, reference())
    }

    fn run(id: ExtractorId, text: &str) -> Option<Construct> {
        let norm = normalize_str(text, &Vocabulary::french());
        table().run(id, &norm, reference()).map(|p| p.construct)
    }

    // ── alternation ─────────────────────────────────────────────────────

    #[test]
    fn test_alternation_is_longest_first() {
        assert_eq!(alternation(["fev", "fevrier", "fevr"]), "fevrier|fevr|fev");
        let re = Regex::new(&format!("^(?:{})$", alternation(["apres-midi", "midi"]))).unwrap();
        assert!(re.is_match("apres-midi"));
    }

    // ── explicit dates ──────────────────────────────────────────────────

    #[test]
    fn test_explicit_full_date() {
        assert_eq!(
            run(ExtractorId::ExplicitDate, "Réunion le 12 mars 2026"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(12, 3, 2026)]
            })
        );
    }

    #[test]
    fn test_explicit_day_list_shares_month() {
        assert_eq!(
            run(ExtractorId::ExplicitDate, "les 12, 13 et 14 mars 2026"),
            Some(Construct::Absolute {
                days: vec![
                    CalendarDay::new(12, 3, 2026),
                    CalendarDay::new(13, 3, 2026),
                    CalendarDay::new(14, 3, 2026),
                ]
            })
        );
    }

    #[test]
    fn test_explicit_date_without_year_is_forward() {
        // May 31 has passed on June 2, 2025
        assert_eq!(
            run(ExtractorId::ExplicitDate, "le 31 mai"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(31, 5, 2026)]
            })
        );
        assert_eq!(
            run(ExtractorId::ExplicitDate, "le 1er juillet"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(1, 7, 2025)]
            })
        );
    }

    #[test]
    fn test_explicit_impossible_date_is_still_extracted() {
        assert_eq!(
            run(ExtractorId::ExplicitDate, "30 février 2026"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(30, 2, 2026)]
            })
        );
    }

    #[test]
    fn test_numeric_dates() {
        assert_eq!(
            run(ExtractorId::ExplicitDate, "rdv le 15/09/2025"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(15, 9, 2025)]
            })
        );
        assert_eq!(
            run(ExtractorId::ExplicitDate, "2025-09-15"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(15, 9, 2025)]
            })
        );
    }

    #[test]
    fn test_hours_are_not_dates() {
        assert_eq!(run(ExtractorId::ExplicitDate, "a 14h30"), None);
    }

    #[test]
    fn test_explicit_day_list_with_own_weekdays() {
        assert_eq!(
            run(ExtractorId::ExplicitDate, "jeudi 5 et vendredi 6 juin"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(5, 6, 2025), CalendarDay::new(6, 6, 2025)]
            })
        );
        assert_eq!(
            run(ExtractorId::ExplicitDate, "le lundi 9, le mardi 10 ou le jeudi 12 juin"),
            Some(Construct::Absolute {
                days: vec![
                    CalendarDay::new(9, 6, 2025),
                    CalendarDay::new(10, 6, 2025),
                    CalendarDay::new(12, 6, 2025),
                ]
            })
        );
    }

    // ── month and year ──────────────────────────────────────────────────

    #[test]
    fn test_month_year() {
        assert_eq!(
            run(ExtractorId::MonthYear, "mars 2026"),
            Some(Construct::MonthYear {
                month: 3,
                year: 2026
            })
        );
    }

    #[test]
    fn test_month_year_after_ordinal_weekday_is_left_alone() {
        assert_eq!(run(ExtractorId::MonthYear, "premier lundi de mars 2026"), None);
        assert_eq!(run(ExtractorId::MonthYear, "le dernier vendredi d'avril 2026"), None);
        assert_eq!(
            run(ExtractorId::MonthYear, "le deuxième mardi du mois de mai 2026"),
            None
        );
        assert!(extract("premier lundi de mars 2026").is_none());
    }

    #[test]
    fn test_recurring_weekday_of_month() {
        assert_eq!(
            run(ExtractorId::MonthYear, "tous les samedis de mars 2026"),
            Some(Construct::Recurring {
                weekdays: vec![Weekday::Sat],
                span: RecurrenceSpan::Month {
                    month: 3,
                    year: 2026
                }
            })
        );
        assert_eq!(
            run(ExtractorId::MonthYear, "les mardis et jeudis d'avril"),
            Some(Construct::Recurring {
                weekdays: vec![Weekday::Tue, Weekday::Thu],
                span: RecurrenceSpan::Month {
                    month: 4,
                    year: 2026
                }
            })
        );
    }

    // ── weekday sets ────────────────────────────────────────────────────

    #[test]
    fn test_weekday_pair() {
        let c = run(ExtractorId::WeekdaySet, "lundi ou mardi").unwrap();
        assert_eq!(
            c,
            Construct::Weekdays {
                items: vec![
                    WeekdayItem {
                        weekday: Weekday::Mon,
                        period: None
                    },
                    WeekdayItem {
                        weekday: Weekday::Tue,
                        period: None
                    },
                ],
                horizon: Horizon::NextOccurrence,
                strictly_future: false,
            }
        );
    }

    #[test]
    fn test_weekdays_keep_their_own_period() {
        let Some(Construct::Weekdays { items, .. }) =
            run(ExtractorId::WeekdaySet, "vendredi soir ou samedi matin")
        else {
            panic!("expected a weekday set");
        };
        assert_eq!(items[0].period, Some(crate::construct::DayPeriod::Evening));
        assert_eq!(items[1].period, Some(crate::construct::DayPeriod::Morning));
    }

    #[test]
    fn test_weekdays_of_next_week() {
        let Some(Construct::Weekdays { horizon, .. }) =
            run(ExtractorId::WeekdaySet, "lundi ou mardi de la semaine prochaine")
        else {
            panic!("expected a weekday set");
        };
        assert_eq!(horizon, Horizon::Week(1));
    }

    #[test]
    fn test_next_weekday_is_strictly_future() {
        let Some(Construct::Weekdays {
            strictly_future, ..
        }) = run(ExtractorId::WeekdaySet, "lundi prochain")
        else {
            panic!("expected a weekday set");
        };
        assert!(strictly_future);
    }

    #[test]
    fn test_every_weekday_is_recurring() {
        assert_eq!(
            run(ExtractorId::WeekdaySet, "tous les lundis"),
            Some(Construct::Recurring {
                weekdays: vec![Weekday::Mon],
                span: RecurrenceSpan::DefaultHorizon
            })
        );
    }

    #[test]
    fn test_ordinal_weekday_is_left_to_fallback() {
        assert_eq!(run(ExtractorId::WeekdaySet, "le premier lundi de mars"), None);
        assert_eq!(run(ExtractorId::WeekdaySet, "lundi dernier"), None);
    }

    // ── relative offsets ────────────────────────────────────────────────

    #[test]
    fn test_relative_day_words() {
        assert_eq!(
            run(ExtractorId::RelativeOffset, "après-demain"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(2)
            })
        );
        assert_eq!(
            run(ExtractorId::RelativeOffset, "Aujourd'hui"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(0)
            })
        );
    }

    #[test]
    fn test_relative_next_week() {
        assert_eq!(
            run(ExtractorId::RelativeOffset, "la semaine prochaine"),
            Some(Construct::Relative {
                offset: RelativeOffset::Week(1)
            })
        );
    }

    #[test]
    fn test_relative_in_fifteen_days() {
        assert_eq!(
            run(ExtractorId::RelativeOffset, "dans quinze jours"),
            Some(Construct::Relative {
                offset: RelativeOffset::Weeks(2)
            })
        );
        assert_eq!(
            run(ExtractorId::RelativeOffset, "il y a 3 jours"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(-3)
            })
        );
    }

    #[test]
    fn test_relative_month_parts() {
        assert_eq!(
            run(ExtractorId::RelativeOffset, "début avril"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::Beginning,
                    month: 4,
                    year: 2026
                }
            })
        );
        assert_eq!(
            run(ExtractorId::RelativeOffset, "à la fin du mois de juin"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::End,
                    month: 6,
                    year: 2025
                }
            })
        );
        assert_eq!(
            run(ExtractorId::RelativeOffset, "mi-juillet"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::Middle,
                    month: 7,
                    year: 2025
                }
            })
        );
    }

    #[test]
    fn test_relative_month_part_of_next_month() {
        assert_eq!(
            run(ExtractorId::RelativeOffset, "début du mois prochain"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::Beginning,
                    month: 7,
                    year: 2025
                }
            })
        );
    }

    // ── ranges ──────────────────────────────────────────────────────────

    #[test]
    fn test_range_without_month_uses_reference_month() {
        assert_eq!(
            run(ExtractorId::Range, "du 23 au 24"),
            Some(Construct::Range {
                start: RangeBound::Day(CalendarDay::new(23, 6, 2025)),
                end: RangeBound::Day(CalendarDay::new(24, 6, 2025)),
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn test_range_crossing_month_end() {
        assert_eq!(
            run(ExtractorId::Range, "du 28 juin au 3 juillet"),
            Some(Construct::Range {
                start: RangeBound::Day(CalendarDay::new(28, 6, 2025)),
                end: RangeBound::Day(CalendarDay::new(3, 7, 2025)),
                weekdays: vec![],
            })
        );
        assert_eq!(
            run(ExtractorId::Range, "du 28 au 3 juillet"),
            Some(Construct::Range {
                start: RangeBound::Day(CalendarDay::new(28, 6, 2025)),
                end: RangeBound::Day(CalendarDay::new(3, 7, 2025)),
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn test_range_with_weekday_filter() {
        assert_eq!(
            run(ExtractorId::Range, "les samedis du 1 au 31 mars 2026"),
            Some(Construct::Range {
                start: RangeBound::Day(CalendarDay::new(1, 3, 2026)),
                end: RangeBound::Day(CalendarDay::new(31, 3, 2026)),
                weekdays: vec![Weekday::Sat],
            })
        );
    }

    #[test]
    fn test_weekday_range() {
        assert_eq!(
            run(ExtractorId::Range, "entre mardi et jeudi"),
            Some(Construct::Range {
                start: RangeBound::Weekday(Weekday::Tue),
                end: RangeBound::Weekday(Weekday::Thu),
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn test_time_range_is_not_a_day_range() {
        assert_eq!(run(ExtractorId::Range, "entre 14 et 16h"), None);
    }

    #[test]
    fn test_range_without_month_skips_short_months() {
        // June has no 31st
        assert_eq!(
            run(ExtractorId::Range, "du 28 au 31"),
            Some(Construct::Range {
                start: RangeBound::Day(CalendarDay::new(28, 7, 2025)),
                end: RangeBound::Day(CalendarDay::new(31, 7, 2025)),
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn test_weekday_range_of_a_named_week() {
        assert_eq!(
            run(ExtractorId::Range, "du lundi au vendredi de la semaine prochaine"),
            Some(Construct::Range {
                start: RangeBound::WeekdayInWeek(Weekday::Mon, 1),
                end: RangeBound::Weekday(Weekday::Fri),
                weekdays: vec![],
            })
        );
        assert_eq!(
            run(ExtractorId::Range, "de mardi a jeudi cette semaine"),
            Some(Construct::Range {
                start: RangeBound::WeekdayInWeek(Weekday::Tue, 0),
                end: RangeBound::Weekday(Weekday::Thu),
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn test_weekday_range_with_qualifier_wins_arbitration() {
        let p = extract("du lundi au vendredi de la semaine prochaine").unwrap();
        assert_eq!(p.origin, Origin::Extractor(ExtractorId::Range));
    }

    // ── arbitration ─────────────────────────────────────────────────────

    #[test]
    fn test_priority_order() {
        let p = extract("samedi 12 mars 2026").unwrap();
        assert_eq!(p.origin, Origin::Extractor(ExtractorId::ExplicitDate));
    }

    #[test]
    fn test_enclosing_range_replaces_explicit_date() {
        let p = extract("du 15 au 20 mars 2026").unwrap();
        assert_eq!(p.origin, Origin::Extractor(ExtractorId::Range));
        assert_eq!(p.span, 0.."du 15 au 20 mars 2026".len());
    }

    #[test]
    fn test_enclosing_weekday_range_replaces_weekday_set() {
        let p = extract("entre mardi et jeudi").unwrap();
        assert_eq!(p.origin, Origin::Extractor(ExtractorId::Range));
    }

    #[test]
    fn test_enclosing_month_part_replaces_month_year() {
        let p = extract("début mars 2026").unwrap();
        assert_eq!(p.origin, Origin::Extractor(ExtractorId::RelativeOffset));
    }

    #[test]
    fn test_no_match() {
        assert!(extract("on mange une pizza ?").is_none());
        assert!(extract("").is_none());
    }
}
