//! Property tests for the resolver's output invariants.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use doodates_temporal::{resolve, Confidence, ResolveOptions, Resolver};
use proptest::prelude::*;

const PHRASES: &[&str] = &[
    "lundi ou mardi",
    "vendredi soir ou samedi matin",
    "lundi prochain",
    "tous les lundis",
    "lundi ou mardi de la semaine prochaine",
    "demain",
    "hier",
    "avant-hier",
    "il y a 3 jours",
    "dans quinze jours",
    "semaine prochaine",
    "cette semaine",
    "ce weekend",
    "mois prochain",
    "début avril",
    "fin mars",
    "mi-mai",
    "fin du mois",
    "12 février",
    "12, 13 et 14 mars 2026",
    "mars 2026",
    "tous les samedis de mars 2026",
    "du 15 au 20 mars 2026",
    "du 28 au 3",
    "entre mardi et jeudi",
    "les samedis du 1 au 31 mai",
    "le premier lundi de juillet",
    "le dernier vendredi du mois",
    "next friday",
    "in 2 weeks",
    "30 février 2026",
    "on mange une pizza ?",
];

const WEEKDAYS: &[(&str, Weekday)] = &[
    ("lundi", Weekday::Mon),
    ("mardi", Weekday::Tue),
    ("mercredi", Weekday::Wed),
    ("jeudi", Weekday::Thu),
    ("vendredi", Weekday::Fri),
    ("samedi", Weekday::Sat),
    ("dimanche", Weekday::Sun),
];

const MONTHS: &[&str] = &[
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

fn phrase() -> impl Strategy<Value = &'static str> {
    prop::sample::select(PHRASES)
}

fn reference_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..2000).prop_map(|n| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n))
}

fn past_allowed() -> ResolveOptions {
    ResolveOptions {
        allow_past: true,
        ..ResolveOptions::default()
    }
}

proptest! {
    #[test]
    fn prop_dates_sorted_and_unique(text in phrase(), reference in reference_date()) {
        for options in [ResolveOptions::default(), past_allowed()] {
            let dates = resolve(text, reference, &options).dates();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]), "{text}: {dates:?}");
        }
    }

    #[test]
    fn prop_free_text_never_breaks_ordering(text in "[a-z0-9éèàçû' -]{0,40}", reference in reference_date()) {
        let dates = resolve(&text, reference, &ResolveOptions::default()).dates();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_idempotent(text in phrase(), reference in reference_date()) {
        let resolver = Resolver::default();
        prop_assert_eq!(resolver.resolve(text, reference), resolver.resolve(text, reference));
    }

    #[test]
    fn prop_past_dates_only_with_allow_past(text in phrase(), reference in reference_date()) {
        let default = resolve(text, reference, &ResolveOptions::default());
        prop_assert!(default.resolved.iter().all(|r| r.date >= reference));

        let backfill = resolve(text, reference, &past_allowed());
        let future: Vec<String> = backfill
            .resolved
            .iter()
            .filter(|r| r.date >= reference)
            .map(|r| r.iso())
            .collect();
        prop_assert_eq!(default.dates(), future);
    }

    #[test]
    fn prop_explicit_date_is_exact(
        year in 2030i32..2040,
        month in 1u32..=12,
        day in 1u32..=28,
        reference in reference_date(),
    ) {
        let text = format!("{day} {} {year}", MONTHS[month as usize - 1]);
        let result = resolve(&text, reference, &ResolveOptions::default());
        let expected = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        prop_assert_eq!(result.dates(), vec![expected.format("%Y-%m-%d").to_string()]);
        prop_assert_eq!(result.confidence, Confidence::High);
    }

    #[test]
    fn prop_recurring_weekday_of_month(
        weekday in 0usize..7,
        month in 1u32..=12,
        year in 2030i32..2040,
        reference in reference_date(),
    ) {
        let (name, weekday) = WEEKDAYS[weekday];
        let text = format!("tous les {name}s de {} {year}", MONTHS[month as usize - 1]);
        let result = resolve(&text, reference, &ResolveOptions::default());

        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        let expected: Vec<NaiveDate> = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .filter(|d| d.weekday() == weekday)
            .collect();
        let got: Vec<NaiveDate> = result.resolved.iter().map(|r| r.date).collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(result.confidence, Confidence::High);
    }
}
