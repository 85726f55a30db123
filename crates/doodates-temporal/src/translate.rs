//! Fallback translation of residual French temporal vocabulary into English.
//!
//! Only used when no extractor matched. Known phrases are replaced on word
//! boundaries, longest first; anything the table does not know is left as is,
//! so English input passes through unchanged.

use crate::construct::LanguageMarker;
use crate::normalize::{is_word_char, replace_phrases};
use crate::vocabulary::Vocabulary;

const FRENCH_MARKERS: &[&str] = &[
    "le", "la", "les", "du", "de", "des", "au", "et", "ou", "dans", "prochain", "prochaine",
    "dernier", "derniere", "demain", "aujourdhui", "hier", "semaine", "mois", "jour", "jours",
    "debut", "fin", "tous", "chaque", "entre",
];

const ENGLISH_MARKERS: &[&str] = &[
    "the", "of", "and", "or", "next", "last", "this", "in", "ago", "today", "tomorrow",
    "yesterday", "week", "weeks", "month", "months", "day", "days", "weekend", "beginning",
    "end", "mid", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

/// Replace the vocabulary's French phrases by their English equivalents.
pub fn translate(normalized: &str, vocabulary: &Vocabulary) -> String {
    let chars: Vec<(char, usize)> = normalized.chars().map(|c| (c, 0)).collect();
    replace_phrases(&chars, &vocabulary.translations)
        .into_iter()
        .map(|(c, _)| c)
        .collect()
}

/// Which languages a normalized text shows signs of.
pub fn detect_markers(normalized: &str, vocabulary: &Vocabulary) -> Vec<LanguageMarker> {
    let words: Vec<&str> = normalized
        .split(|c: char| !is_word_char(c) && c != '-')
        .filter(|w| !w.is_empty())
        .collect();

    let french = words.iter().any(|w| {
        FRENCH_MARKERS.contains(w)
            || vocabulary.weekday(w).is_some()
            || vocabulary.month(w).is_some()
            || vocabulary.period(w).is_some()
    });
    let english = words.iter().any(|w| {
        ENGLISH_MARKERS.contains(w)
            || vocabulary.months.iter().any(|m| m.english == *w)
    });

    let mut markers = Vec::new();
    if french {
        markers.push(LanguageMarker::French);
    }
    if english {
        markers.push(LanguageMarker::English);
    }
    markers
}
