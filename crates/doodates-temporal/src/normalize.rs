//! Lexical normalization of raw user input.
//!
//! Folds case, strips French diacritics, unifies apostrophes and whitespace,
//! then collapses the vocabulary's synonym phrases. Every byte of the output
//! remembers the byte offset of the source character it came from, so spans
//! found in normalized text can be reported against the original input.

use std::ops::Range;

use crate::vocabulary::Vocabulary;

/// Normalized text plus its mapping back to the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    /// Source byte offset for each byte of `text`.
    origins: Vec<usize>,
    source_len: usize,
}

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Map a byte span of the normalized text onto the source string.
    pub fn source_span(&self, span: Range<usize>) -> Range<usize> {
        let start = self.origin_at(span.start);
        let end = if span.end >= self.text.len() {
            self.source_len
        } else {
            self.origin_at(span.end)
        };
        // A span ending inside a collapsed phrase maps to the phrase start;
        // never report an inverted range.
        start..end.max(start)
    }

    fn origin_at(&self, index: usize) -> usize {
        self.origins.get(index).copied().unwrap_or(self.source_len)
    }
}

/// Normalize `input` for pattern matching. Never fails.
pub fn normalize(input: &str, vocabulary: &Vocabulary) -> NormalizedText {
    let folded = fold(input);
    let collapsed = replace_phrases(&folded, &vocabulary.synonyms);
    let mut text = String::with_capacity(collapsed.len());
    let mut origins = Vec::with_capacity(collapsed.len());
    for (c, origin) in collapsed {
        text.push(c);
        origins.extend(std::iter::repeat_n(origin, c.len_utf8()));
    }
    NormalizedText {
        text,
        origins,
        source_len: input.len(),
    }
}

/// Lower-case, strip diacritics, unify apostrophes and whitespace.
fn fold(input: &str) -> Vec<(char, usize)> {
    let mut out: Vec<(char, usize)> = Vec::with_capacity(input.len());
    for (offset, c) in input.char_indices() {
        if c.is_whitespace() {
            if out.last().is_some_and(|&(last, _)| last != ' ') {
                out.push((' ', offset));
            }
            continue;
        }
        for lower in c.to_lowercase() {
            match strip_diacritic(lower) {
                Folded::One(f) => out.push((f, offset)),
                Folded::Two(a, b) => {
                    out.push((a, offset));
                    out.push((b, offset));
                }
            }
        }
    }
    if out.last().is_some_and(|&(c, _)| c == ' ') {
        out.pop();
    }
    out
}

enum Folded {
    One(char),
    Two(char, char),
}

fn strip_diacritic(c: char) -> Folded {
    let folded = match c {
        'à' | 'â' | 'ä' | 'á' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' | 'í' => 'i',
        'ô' | 'ö' | 'ó' => 'o',
        'ù' | 'û' | 'ü' | 'ú' => 'u',
        'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        '\u{2019}' | '\u{2018}' | '`' | '´' => '\'',
        '\u{2010}' | '\u{2011}' | '\u{2013}' => '-',
        'œ' => return Folded::Two('o', 'e'),
        'æ' => return Folded::Two('a', 'e'),
        other => other,
    };
    Folded::One(folded)
}

/// Replace whole-word phrases, longest phrase first at each position.
///
/// Replacement characters inherit the origin of the first character of the
/// phrase they replace.
pub(crate) fn replace_phrases(
    input: &[(char, usize)],
    table: &[(String, String)],
) -> Vec<(char, usize)> {
    let mut phrases: Vec<(Vec<char>, &str)> = table
        .iter()
        .map(|(from, to)| (from.chars().collect(), to.as_str()))
        .collect();
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        let at_word_start = i == 0 || !is_word_char(input[i - 1].0);
        let matched = if at_word_start {
            phrases
                .iter()
                .find(|(from, _)| matches_at(input, i, from))
        } else {
            None
        };
        match matched {
            Some((from, to)) => {
                let origin = input[i].1;
                out.extend(to.chars().map(|c| (c, origin)));
                i += from.len();
            }
            None => {
                out.push(input[i]);
                i += 1;
            }
        }
    }
    out
}

fn matches_at(input: &[(char, usize)], at: usize, phrase: &[char]) -> bool {
    if at + phrase.len() > input.len() {
        return false;
    }
    if !input[at..at + phrase.len()]
        .iter()
        .zip(phrase)
        .all(|(&(c, _), &p)| c == p)
    {
        return false;
    }
    // Phrases ending in a separator ("d'") may run straight into the next word.
    let needs_boundary = phrase.last().is_some_and(|&c| is_word_char(c));
    !needs_boundary
        || input
            .get(at + phrase.len())
            .is_none_or(|&(c, _)| !is_word_char(c))
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Convenience for callers that only need the normalized string.
pub fn normalize_str(input: &str, vocabulary: &Vocabulary) -> String {
    normalize(input, vocabulary).text
}
