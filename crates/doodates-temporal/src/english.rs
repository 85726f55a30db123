//! General-purpose English date grammar for the fallback path.
//!
//! The translated text is scanned token window by token window: every start
//! position from left to right, and at each position the longest window
//! first, so the reported match is the earliest-starting, longest one. Each
//! window is normalized and offered to the parsers in order of specificity.
//! Dates without a year are read with a forward bias: the next occurrence on
//! or after the reference date.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::{
    infer_year, last_day_of_month, month_with_day, nth_weekday_in_month, previous_weekday,
    shift_month,
};
use crate::construct::{
    CalendarDay, Construct, Horizon, MonthPart, Origin, ParsedConstruct, RelativeOffset,
    WeekdayItem,
};

/// Longest phrase the grammar knows, in tokens ("first monday of march 2026").
const MAX_WINDOW: usize = 6;

/// Find the first date expression in English text.
pub fn parse(text: &str, reference: NaiveDate) -> Option<ParsedConstruct> {
    let tokens = tokenize(text);
    for start in 0..tokens.len() {
        let longest = MAX_WINDOW.min(tokens.len() - start);
        for len in (1..=longest).rev() {
            let window = &tokens[start..start + len];
            let words: Vec<&str> = window.iter().map(|(_, w)| *w).collect();
            let phrase = normalize_expression(&words.join(" "));
            if phrase.is_empty() {
                continue;
            }

            let construct = try_anchored(&phrase)
                .or_else(|| try_weekday_relative(&phrase, reference))
                .or_else(|| try_ordinal_date(&phrase, reference))
                .or_else(|| try_month_part(&phrase, reference))
                .or_else(|| try_period_relative(&phrase))
                .or_else(|| try_natural_offset(&phrase))
                .or_else(|| try_month_day(&phrase, reference))
                .or_else(|| try_month_year(&phrase, reference))
                .or_else(|| try_day_of_month(&words, reference));

            if let Some(construct) = construct {
                let (first, _) = window[0];
                let (last, last_word) = window[len - 1];
                return Some(ParsedConstruct::new(
                    construct,
                    Origin::Fallback,
                    first..last + last_word.len(),
                ));
            }
        }
    }
    None
}

/// Split on whitespace, keeping byte offsets and dropping trailing punctuation.
fn tokenize(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                let word = text[s..i].trim_end_matches([',', '.', ';', ':', '!', '?']);
                if !word.is_empty() {
                    tokens.push((s, word));
                }
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    tokens
}

/// Normalize expression: trim, lowercase, strip articles.
fn normalize_expression(s: &str) -> String {
    let s = format!(" {} ", s.trim().to_lowercase());
    let s = s
        .replace(" the ", " ")
        .replace(" a ", " ")
        .replace(" an ", " ");
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Parsers ─────────────────────────────────────────────────────────────────

/// "today", "tomorrow", "yesterday", ...
fn try_anchored(s: &str) -> Option<Construct> {
    let days = match s {
        "today" | "tonight" => 0,
        "tomorrow" => 1,
        "day after tomorrow" => 2,
        "yesterday" => -1,
        "day before yesterday" => -2,
        _ => return None,
    };
    Some(Construct::Relative {
        offset: RelativeOffset::Days(days),
    })
}

/// "next monday", "this friday", "last wednesday", or a bare weekday.
fn try_weekday_relative(s: &str, reference: NaiveDate) -> Option<Construct> {
    let weekdays = |weekday: Weekday, horizon: Horizon, strictly_future: bool| {
        Some(Construct::Weekdays {
            items: vec![WeekdayItem {
                weekday,
                period: None,
            }],
            horizon,
            strictly_future,
        })
    };

    let parts: Vec<&str> = s.split(' ').collect();
    match parts.as_slice() {
        [day] => weekdays(parse_weekday(day)?, Horizon::NextOccurrence, false),
        ["next", day] => weekdays(parse_weekday(day)?, Horizon::NextOccurrence, true),
        ["this", day] => weekdays(parse_weekday(day)?, Horizon::Week(0), false),
        ["last", day] => {
            // Always past: if today is the same weekday, go to last week
            let date = previous_weekday(reference, parse_weekday(day)?);
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(date.day(), date.month(), date.year())],
            })
        }
        _ => None,
    }
}

/// "first monday of march [2026]", "last friday of month",
/// "second tuesday of next month", "last day of march".
fn try_ordinal_date(s: &str, reference: NaiveDate) -> Option<Construct> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let of_idx = parts.iter().position(|&p| p == "of")?;
    if of_idx != 2 || parts.len() < 4 {
        return None;
    }

    let ordinal_str = parts[0];
    let target_str = parts[1];

    // (month, year, whether the year was inferred from a bare month name)
    let (month, year, floating) = match &parts[of_idx + 1..] {
        ["month"] => (reference.month(), reference.year(), false),
        ["next", "month"] => {
            let (y, m) = shift_month(reference.year(), reference.month(), 1);
            (m, y, false)
        }
        [month] => (parse_month(month)?, reference.year(), true),
        [month, year] => (parse_month(month)?, parse_year(year)?, false),
        _ => return None,
    };

    let date = |year: i32| -> Option<NaiveDate> {
        if ordinal_str == "last" && target_str == "day" {
            last_day_of_month(year, month)
        } else {
            nth_weekday_in_month(
                year,
                month,
                parse_weekday(target_str)?,
                parse_ordinal(ordinal_str)?,
            )
        }
    };

    let mut resolved = date(year)?;
    if floating && resolved < reference {
        resolved = date(year + 1)?;
    }

    if ordinal_str == "last" && target_str == "day" {
        return Some(Construct::Absolute {
            days: vec![CalendarDay::new(
                resolved.day(),
                resolved.month(),
                resolved.year(),
            )],
        });
    }
    Some(Construct::NthWeekday {
        ordinal: parse_ordinal(ordinal_str)?,
        weekday: parse_weekday(target_str)?,
        month: resolved.month(),
        year: resolved.year(),
    })
}

/// "beginning of march", "end of month", "mid april 2026",
/// "beginning of next month".
fn try_month_part(s: &str, reference: NaiveDate) -> Option<Construct> {
    let (part, rest) = if let Some(r) = s.strip_prefix("beginning of ") {
        (MonthPart::Beginning, r)
    } else if let Some(r) = s.strip_prefix("start of ") {
        (MonthPart::Beginning, r)
    } else if let Some(r) = s.strip_prefix("end of ") {
        (MonthPart::End, r)
    } else if let Some(r) = s.strip_prefix("mid ") {
        (MonthPart::Middle, r.strip_prefix("of ").unwrap_or(r))
    } else if let Some(r) = s.strip_prefix("middle of ") {
        (MonthPart::Middle, r)
    } else {
        return None;
    };

    let parts: Vec<&str> = rest.split_whitespace().collect();
    let (month, year) = match parts.as_slice() {
        ["month"] | ["this", "month"] => (reference.month(), reference.year()),
        ["next", "month"] => {
            let (y, m) = shift_month(reference.year(), reference.month(), 1);
            (m, y)
        }
        [month] => {
            let month = parse_month(month)?;
            let last_day = match part {
                MonthPart::Beginning => 10,
                MonthPart::Middle => 20,
                MonthPart::End => 31,
            };
            (month, infer_year(month, Some(last_day), reference))
        }
        [month, year] => (parse_month(month)?, parse_year(year)?),
        _ => return None,
    };

    Some(Construct::Relative {
        offset: RelativeOffset::MonthPart { part, month, year },
    })
}

/// "next week", "this month", "last week", "next weekend".
fn try_period_relative(s: &str) -> Option<Construct> {
    let offset = match s {
        "next week" => RelativeOffset::Week(1),
        "this week" => RelativeOffset::Week(0),
        "last week" => RelativeOffset::Week(-1),
        "next month" => RelativeOffset::Month(1),
        "this month" => RelativeOffset::Month(0),
        "last month" => RelativeOffset::Month(-1),
        "next weekend" => RelativeOffset::Weekend(1),
        "this weekend" | "weekend" => RelativeOffset::Weekend(0),
        "last weekend" => RelativeOffset::Weekend(-1),
        _ => return None,
    };
    Some(Construct::Relative { offset })
}

/// "in 3 days", "in 2 weeks", "5 days ago".
fn try_natural_offset(s: &str) -> Option<Construct> {
    let (sign, rest) = if let Some(r) = s.strip_prefix("in ") {
        (1, r)
    } else if let Some(r) = s.strip_suffix(" ago") {
        (-1, r)
    } else {
        return None;
    };

    let (n, unit) = parse_natural_number_and_unit(rest)?;
    let offset = match unit {
        "day" => RelativeOffset::Days(sign * n),
        "week" => RelativeOffset::Weeks(sign * n),
        "month" => RelativeOffset::Months(sign * n),
        _ => return None,
    };
    Some(Construct::Relative { offset })
}

/// "march 12", "march 12 2026", "12 march", "12th of march 2026".
fn try_month_day(s: &str, reference: NaiveDate) -> Option<Construct> {
    let parts: Vec<&str> = s.split_whitespace().filter(|&p| p != "of").collect();
    let (day, month, year) = match parts.as_slice() {
        [a, b] => day_month(a, b)?,
        [a, b, year] => {
            let (day, month, _) = day_month(a, b)?;
            (day, month, Some(parse_year(year)?))
        }
        _ => return None,
    };
    let year = year.unwrap_or_else(|| infer_year(month, Some(day), reference));
    Some(Construct::Absolute {
        days: vec![CalendarDay::new(day, month, year)],
    })
}

fn day_month(a: &str, b: &str) -> Option<(u32, u32, Option<i32>)> {
    if let Some(month) = parse_month(a) {
        Some((parse_day(b)?, month, None))
    } else {
        Some((parse_day(a)?, parse_month(b)?, None))
    }
}

/// "march 2026" or a bare "march".
fn try_month_year(s: &str, reference: NaiveDate) -> Option<Construct> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let (month, year) = match parts.as_slice() {
        [month] => {
            let month = parse_month(month)?;
            (month, infer_year(month, None, reference))
        }
        [month, year] => (parse_month(month)?, parse_year(year)?),
        _ => return None,
    };
    Some(Construct::MonthYear { month, year })
}

/// "the 12th": the next day with that number, in the first month that has it.
///
/// Works on the raw window because normalization strips the article.
fn try_day_of_month(words: &[&str], reference: NaiveDate) -> Option<Construct> {
    let ["the", day] = words else {
        return None;
    };
    let day = parse_day(day)?;
    let (year, month) = month_with_day(day, reference);
    Some(Construct::Absolute {
        days: vec![CalendarDay::new(day, month, year)],
    })
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse a weekday name (full and abbreviated).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a month name to number (1-12).
fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

/// Parse an ordinal: "first"→1, "second"→2, ..., "last"→-1.
fn parse_ordinal(s: &str) -> Option<i32> {
    match s {
        "first" | "1st" => Some(1),
        "second" | "2nd" => Some(2),
        "third" | "3rd" => Some(3),
        "fourth" | "4th" => Some(4),
        "fifth" | "5th" => Some(5),
        "last" => Some(-1),
        _ => None,
    }
}

/// A day of month, with or without an English ordinal suffix ("12", "12th").
fn parse_day(s: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s);
    let day: u32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn parse_year(s: &str) -> Option<i32> {
    if s.len() != 4 {
        return None;
    }
    s.parse().ok()
}

/// Parse "3 days", "a week", "2 months" into (count, singular unit).
fn parse_natural_number_and_unit(s: &str) -> Option<(i64, &'static str)> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let (n, unit) = match parts.as_slice() {
        [n, unit] => (n.parse::<i64>().ok().filter(|n| (0..=999).contains(n))?, *unit),
        // Articles are stripped by normalization: "in a week" → "in week"
        [unit] => (1, *unit),
        _ => return None,
    };
    let unit = match unit {
        "day" | "days" => "day",
        "week" | "weeks" => "week",
        "month" | "months" => "month",
        _ => return None,
    };
    Some((n, unit))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        // Monday, June 2, 2025
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn construct(text: &str) -> Option<Construct> {
        parse(text, anchor()).map(|p| p.construct)
    }

    #[test]
    fn test_normalize_expression_strips_articles() {
        assert_eq!(normalize_expression("The end of the month"), "end of month");
        assert_eq!(normalize_expression("  in   a week "), "in week");
    }

    #[test]
    fn test_tokenize_keeps_offsets() {
        let tokens = tokenize("next monday, please");
        assert_eq!(tokens, vec![(0, "next"), (5, "monday"), (13, "please")]);
    }

    #[test]
    fn test_anchored() {
        assert_eq!(
            construct("tomorrow"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(1)
            })
        );
        assert_eq!(
            construct("the day after tomorrow"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(2)
            })
        );
    }

    #[test]
    fn test_next_weekday() {
        assert_eq!(
            construct("next monday"),
            Some(Construct::Weekdays {
                items: vec![WeekdayItem {
                    weekday: Weekday::Mon,
                    period: None
                }],
                horizon: Horizon::NextOccurrence,
                strictly_future: true,
            })
        );
    }

    #[test]
    fn test_last_weekday_is_in_the_past() {
        // The previous Friday before Monday, June 2
        assert_eq!(
            construct("last friday"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(30, 5, 2025)]
            })
        );
    }

    #[test]
    fn test_ordinal_weekday_of_month() {
        assert_eq!(
            construct("the first monday of march"),
            Some(Construct::NthWeekday {
                ordinal: 1,
                weekday: Weekday::Mon,
                month: 3,
                year: 2026
            })
        );
        assert_eq!(
            construct("last friday of the month"),
            Some(Construct::NthWeekday {
                ordinal: -1,
                weekday: Weekday::Fri,
                month: 6,
                year: 2025
            })
        );
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            construct("last day of february 2028"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(29, 2, 2028)]
            })
        );
    }

    #[test]
    fn test_month_parts() {
        assert_eq!(
            construct("beginning of next month"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::Beginning,
                    month: 7,
                    year: 2025
                }
            })
        );
        assert_eq!(
            construct("mid march"),
            Some(Construct::Relative {
                offset: RelativeOffset::MonthPart {
                    part: MonthPart::Middle,
                    month: 3,
                    year: 2026
                }
            })
        );
    }

    #[test]
    fn test_period_relative() {
        assert_eq!(
            construct("the next week"),
            Some(Construct::Relative {
                offset: RelativeOffset::Week(1)
            })
        );
    }

    #[test]
    fn test_natural_offsets() {
        assert_eq!(
            construct("in 3 days"),
            Some(Construct::Relative {
                offset: RelativeOffset::Days(3)
            })
        );
        assert_eq!(
            construct("2 weeks ago"),
            Some(Construct::Relative {
                offset: RelativeOffset::Weeks(-2)
            })
        );
    }

    #[test]
    fn test_month_day_forward_bias() {
        assert_eq!(
            construct("march 12"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(12, 3, 2026)]
            })
        );
        assert_eq!(
            construct("the 12th of june"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(12, 6, 2025)]
            })
        );
    }

    #[test]
    fn test_month_alone() {
        assert_eq!(
            construct("march"),
            Some(Construct::MonthYear {
                month: 3,
                year: 2026
            })
        );
    }

    #[test]
    fn test_day_of_month() {
        assert_eq!(
            construct("on the 1st"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(1, 7, 2025)]
            })
        );
        // June has no 31st
        assert_eq!(
            construct("the 31"),
            Some(Construct::Absolute {
                days: vec![CalendarDay::new(31, 7, 2025)]
            })
        );
    }

    #[test]
    fn test_earliest_match_span() {
        let p = parse("let's meet next friday or saturday", anchor()).unwrap();
        assert_eq!(p.span, 11..22);
        assert_eq!(p.origin, Origin::Fallback);
    }

    #[test]
    fn test_no_date() {
        assert!(parse("pizza with friends", anchor()).is_none());
        assert!(parse("", anchor()).is_none());
    }
}
