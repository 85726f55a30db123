//! French temporal vocabulary.
//!
//! Pure data: day, month and day-period names with their calendar values and
//! English equivalents, the synonym phrases the normalizer collapses, and the
//! phrase table the fallback translator uses. All entries are written in
//! normalized form (lower-case, no diacritics).

use chrono::Weekday;

use crate::construct::DayPeriod;
use crate::error::{ResolverError, Result};

const WEEKDAYS: [(&str, Weekday, &str); 7] = [
    ("lundi", Weekday::Mon, "monday"),
    ("mardi", Weekday::Tue, "tuesday"),
    ("mercredi", Weekday::Wed, "wednesday"),
    ("jeudi", Weekday::Thu, "thursday"),
    ("vendredi", Weekday::Fri, "friday"),
    ("samedi", Weekday::Sat, "saturday"),
    ("dimanche", Weekday::Sun, "sunday"),
];

// "sept" is deliberately absent: it collides with the number seven.
const MONTHS: [(&str, u32, &str); 20] = [
    ("janvier", 1, "january"),
    ("janv", 1, "january"),
    ("fevrier", 2, "february"),
    ("fevr", 2, "february"),
    ("fev", 2, "february"),
    ("mars", 3, "march"),
    ("avril", 4, "april"),
    ("avr", 4, "april"),
    ("mai", 5, "may"),
    ("juin", 6, "june"),
    ("juillet", 7, "july"),
    ("juil", 7, "july"),
    ("aout", 8, "august"),
    ("septembre", 9, "september"),
    ("octobre", 10, "october"),
    ("oct", 10, "october"),
    ("novembre", 11, "november"),
    ("nov", 11, "november"),
    ("decembre", 12, "december"),
    ("dec", 12, "december"),
];

const DAY_PERIODS: [(&str, DayPeriod); 6] = [
    ("matin", DayPeriod::Morning),
    ("matinee", DayPeriod::Morning),
    ("midi", DayPeriod::Midday),
    ("apres-midi", DayPeriod::Afternoon),
    ("soir", DayPeriod::Evening),
    ("soiree", DayPeriod::Evening),
];

const SYNONYMS: &[(&str, &str)] = &[
    // Month beginnings
    ("au debut du mois de", "debut"),
    ("au debut du mois d'", "debut "),
    ("au debut du mois", "debut du mois"),
    ("au debut de", "debut"),
    ("au debut d'", "debut "),
    ("en debut de", "debut"),
    ("en debut d'", "debut "),
    ("debut du mois de", "debut"),
    ("debut du mois d'", "debut "),
    ("debut de", "debut"),
    ("debut d'", "debut "),
    // Month ends
    ("a la fin du mois de", "fin"),
    ("a la fin du mois d'", "fin "),
    ("a la fin du mois", "fin du mois"),
    ("a la fin de", "fin"),
    ("a la fin d'", "fin "),
    ("en fin de", "fin"),
    ("en fin d'", "fin "),
    ("fin du mois de", "fin"),
    ("fin du mois d'", "fin "),
    ("fin de", "fin"),
    ("fin d'", "fin "),
    // Middles
    ("au milieu du mois de", "milieu"),
    ("au milieu du mois", "milieu du mois"),
    ("au milieu de", "milieu"),
    ("au milieu d'", "milieu "),
    ("milieu du mois de", "milieu"),
    ("milieu de", "milieu"),
    ("milieu d'", "milieu "),
    // Spelling variants
    ("week-end", "weekend"),
    ("week end", "weekend"),
    ("weekends", "weekend"),
    ("apres midi", "apres-midi"),
    ("aprem", "apres-midi"),
    ("aujourd'hui", "aujourdhui"),
    ("aujourd hui", "aujourdhui"),
    ("apres demain", "apres-demain"),
    ("avant hier", "avant-hier"),
    ("1er", "1"),
    ("1ere", "1"),
    // Idiomatic durations
    ("quinze jours", "2 semaines"),
    ("une quinzaine de jours", "2 semaines"),
    ("une quinzaine", "2 semaines"),
    ("huit jours", "1 semaine"),
    ("un jour", "1 jour"),
    ("une semaine", "1 semaine"),
    ("un mois", "1 mois"),
    // Number words
    ("deux", "2"),
    ("trois", "3"),
    ("quatre", "4"),
    ("cinq", "5"),
    ("six", "6"),
    ("sept", "7"),
    ("huit", "8"),
    ("neuf", "9"),
    ("dix", "10"),
    ("onze", "11"),
    ("douze", "12"),
];

const TRANSLATIONS: &[(&str, &str)] = &[
    ("debut du mois prochain", "beginning of next month"),
    ("fin du mois prochain", "end of next month"),
    ("debut du mois", "beginning of the month"),
    ("fin du mois", "end of the month"),
    ("milieu du mois", "mid the month"),
    ("du mois prochain", "of next month"),
    ("du mois", "of the month"),
    ("semaine prochaine", "next week"),
    ("cette semaine", "this week"),
    ("mois prochain", "next month"),
    ("ce mois-ci", "this month"),
    ("ce mois", "this month"),
    ("weekend prochain", "next weekend"),
    ("ce weekend", "this weekend"),
    ("apres-demain", "day after tomorrow"),
    ("aujourdhui", "today"),
    ("demain", "tomorrow"),
    ("hier", "yesterday"),
    ("milieu", "mid"),
    ("debut", "beginning of"),
    ("fin", "end of"),
    ("premier", "first"),
    ("premiere", "first"),
    ("deuxieme", "second"),
    ("seconde", "second"),
    ("troisieme", "third"),
    ("quatrieme", "fourth"),
    ("cinquieme", "fifth"),
    ("dernier", "last"),
    ("derniere", "last"),
    ("prochain", "next"),
    ("prochaine", "next"),
    ("dans", "in"),
    ("jours", "days"),
    ("jour", "day"),
    ("semaines", "weeks"),
    ("semaine", "week"),
    ("mois", "months"),
    ("d'", "of "),
    ("de", "of"),
    ("du", "of"),
    ("en", "in"),
    ("le", "the"),
    ("la", "the"),
    ("les", "the"),
    ("et", "and"),
    ("ou", "or"),
];

/// A weekday name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayEntry {
    pub name: String,
    pub weekday: Weekday,
    pub english: String,
}

/// A month name or abbreviation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthEntry {
    pub name: String,
    pub month: u32,
    pub english: String,
}

/// A time-of-day qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodEntry {
    pub name: String,
    pub period: DayPeriod,
}

/// Static lookup tables used by the normalizer, the extractors and the
/// fallback translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub weekdays: Vec<WeekdayEntry>,
    pub months: Vec<MonthEntry>,
    pub periods: Vec<PeriodEntry>,
    /// Phrase → canonical phrase, applied by the normalizer.
    pub synonyms: Vec<(String, String)>,
    /// French phrase → English phrase, applied by the fallback translator.
    pub translations: Vec<(String, String)>,
}

impl Vocabulary {
    /// The built-in French vocabulary.
    pub fn french() -> Self {
        let weekdays: Vec<WeekdayEntry> = WEEKDAYS
            .iter()
            .map(|&(name, weekday, english)| WeekdayEntry {
                name: name.to_string(),
                weekday,
                english: english.to_string(),
            })
            .collect();
        let months: Vec<MonthEntry> = MONTHS
            .iter()
            .map(|&(name, month, english)| MonthEntry {
                name: name.to_string(),
                month,
                english: english.to_string(),
            })
            .collect();
        let periods = DAY_PERIODS
            .iter()
            .map(|&(name, period)| PeriodEntry {
                name: name.to_string(),
                period,
            })
            .collect();

        let mut synonyms = pairs(SYNONYMS);
        for m in &months {
            synonyms.push((format!("premier {}", m.name), format!("1 {}", m.name)));
        }

        // Modifier order differs between the languages ("lundi prochain" vs
        // "next monday"), so weekday phrases are listed whole.
        let mut translations = Vec::new();
        for w in &weekdays {
            translations.push((format!("{} prochain", w.name), format!("next {}", w.english)));
            translations.push((format!("{} dernier", w.name), format!("last {}", w.english)));
            translations.push((format!("ce {}", w.name), format!("this {}", w.english)));
            translations.push((format!("{}s", w.name), w.english.clone()));
            translations.push((w.name.clone(), w.english.clone()));
        }
        for m in &months {
            translations.push((format!("mi-{}", m.name), format!("mid {}", m.english)));
            translations.push((m.name.clone(), m.english.clone()));
        }
        translations.extend(pairs(TRANSLATIONS));

        Self {
            weekdays,
            months,
            periods,
            synonyms,
            translations,
        }
    }

    /// Check that every entry is usable by the pattern compiler.
    pub fn validate(&self) -> Result<()> {
        if self.weekdays.is_empty() || self.months.is_empty() {
            return Err(ResolverError::InvalidVocabulary(
                "weekday and month tables must not be empty".to_string(),
            ));
        }
        let names = self
            .weekdays
            .iter()
            .map(|w| w.name.as_str())
            .chain(self.months.iter().map(|m| m.name.as_str()))
            .chain(self.periods.iter().map(|p| p.name.as_str()));
        for name in names {
            if name.is_empty() || name.chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
                return Err(ResolverError::InvalidVocabulary(format!(
                    "'{name}' is not a normalized single word"
                )));
            }
        }
        if let Some(m) = self.months.iter().find(|m| !(1..=12).contains(&m.month)) {
            return Err(ResolverError::InvalidVocabulary(format!(
                "month '{}' has number {}",
                m.name, m.month
            )));
        }
        if let Some((from, _)) = self
            .synonyms
            .iter()
            .chain(self.translations.iter())
            .find(|(from, _)| from.is_empty())
        {
            return Err(ResolverError::InvalidVocabulary(format!(
                "empty phrase in table (maps from '{from}')"
            )));
        }
        Ok(())
    }

    pub fn weekday(&self, name: &str) -> Option<Weekday> {
        let name = name.strip_suffix('s').filter(|n| self.has_weekday(n)).unwrap_or(name);
        self.weekdays
            .iter()
            .find(|w| w.name == name)
            .map(|w| w.weekday)
    }

    pub fn month(&self, name: &str) -> Option<u32> {
        let name = name.trim_end_matches('.');
        self.months.iter().find(|m| m.name == name).map(|m| m.month)
    }

    pub fn period(&self, name: &str) -> Option<DayPeriod> {
        self.periods
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.period)
    }

    fn has_weekday(&self, name: &str) -> bool {
        self.weekdays.iter().any(|w| w.name == name)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::french()
    }
}

fn pairs(table: &[(&str, &str)]) -> Vec<(String, String)> {
    table
        .iter()
        .map(|&(from, to)| (from.to_string(), to.to_string()))
        .collect()
}
