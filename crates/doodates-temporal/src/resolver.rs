//! The resolution pipeline.
//!
//! normalize → pattern extractors → (fallback translation + English grammar
//! → injected interpreter) → expansion → time windows → past filter →
//! ordering → arbitration.
//!
//! A [`Resolver`] holds only immutable compiled tables behind an [`Arc`] plus
//! its options, so it is cheap to clone and safe to share across threads.
//! Every call allocates its own output.

use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::arbiter::{arbitrate, Confidence, Proposal};
use crate::construct::{
    Construct, ConstructKind, DayPeriod, Origin, ParsedConstruct, ResolvedDate,
    TemporalExpression,
};
use crate::english;
use crate::error::Result;
use crate::expand::expand;
use crate::extract::ExtractorTable;
use crate::interpreter::Interpreter;
use crate::normalize::{normalize, NormalizedText};
use crate::options::ResolveOptions;
use crate::slots::{group_slots, SlotPatterns, TimeHints, TimeSlot};
use crate::translate::{detect_markers, translate};
use crate::vocabulary::Vocabulary;

// ── Compiled tables ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct Tables {
    vocabulary: Vocabulary,
    extractors: ExtractorTable,
    slots: SlotPatterns,
}

impl Tables {
    fn build(vocabulary: Vocabulary) -> Result<Self> {
        let extractors = ExtractorTable::new(&vocabulary)?;
        let slots = SlotPatterns::new(&vocabulary)?;
        Ok(Self {
            vocabulary,
            extractors,
            slots,
        })
    }

    /// The built-in French tables, compiled on first use.
    fn french() -> Arc<Tables> {
        static FRENCH: OnceLock<Arc<Tables>> = OnceLock::new();
        FRENCH
            .get_or_init(|| {
                Arc::new(
                    Tables::build(Vocabulary::french())
                        .expect("built-in French vocabulary compiles"),
                )
            })
            .clone()
    }
}

// ── Results ─────────────────────────────────────────────────────────────────

/// The outcome of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Ascending, unique, valid dates.
    pub resolved: Vec<ResolvedDate>,
    pub confidence: Confidence,
    pub kind: Option<ConstructKind>,
    pub source: Option<Origin>,
    pub expression: Option<TemporalExpression>,
}

impl ResolutionResult {
    fn empty() -> Self {
        Self {
            resolved: Vec::new(),
            confidence: Confidence::Low,
            kind: None,
            source: None,
            expression: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// ISO `YYYY-MM-DD` strings, ascending.
    pub fn dates(&self) -> Vec<String> {
        self.resolved.iter().map(ResolvedDate::iso).collect()
    }

    pub fn time_slots(&self) -> Vec<TimeSlot> {
        group_slots(&self.resolved)
    }

    /// The external `{ dates, timeSlots?, confidence }` shape.
    pub fn to_output(&self) -> ResolutionOutput {
        ResolutionOutput {
            dates: self.dates(),
            time_slots: self.time_slots(),
            confidence: self.confidence,
        }
    }
}

/// Dates and time slots as consumed by poll storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutput {
    pub dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_slots: Vec<TimeSlot>,
    pub confidence: Confidence,
}

/// Why a proposed date was rejected by [`Resolver::check_dates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionReason {
    /// Not an ISO `YYYY-MM-DD` calendar date.
    Malformed,
    /// Earlier than the reference date.
    Past,
    /// Valid, but not one of the dates the text denotes.
    OutsideExpression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedDate {
    pub date: String,
    pub reason: RejectionReason,
}

/// Proposed dates checked against the deterministic reading of a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateCheck {
    pub accepted: Vec<String>,
    pub rejected: Vec<RejectedDate>,
    /// Dates the text denotes that were not proposed.
    pub missing: Vec<String>,
    /// Confidence of the deterministic reading.
    pub confidence: Confidence,
}

// ── Resolver ────────────────────────────────────────────────────────────────

/// Resolves French scheduling text into poll dates.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use doodates_temporal::{Confidence, ResolveOptions, Resolver};
///
/// let resolver = Resolver::new(ResolveOptions::default());
/// let reference = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
/// let result = resolver.resolve("tous les samedis de mars 2026", reference);
/// assert_eq!(
///     result.dates(),
///     vec!["2026-03-07", "2026-03-14", "2026-03-21", "2026-03-28"]
/// );
/// assert_eq!(result.confidence, Confidence::High);
/// ```
#[derive(Clone)]
pub struct Resolver {
    tables: Arc<Tables>,
    options: ResolveOptions,
    interpreter: Option<Arc<dyn Interpreter>>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .field("interpreter", &self.interpreter.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolveOptions::default())
    }
}

impl Resolver {
    /// A resolver over the built-in French vocabulary.
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            tables: Tables::french(),
            options,
            interpreter: None,
        }
    }

    /// A resolver over a custom vocabulary.
    ///
    /// # Errors
    ///
    /// Returns an error if the vocabulary is inconsistent or its entries do
    /// not compile into patterns.
    pub fn with_vocabulary(vocabulary: Vocabulary, options: ResolveOptions) -> Result<Self> {
        Ok(Self {
            tables: Arc::new(Tables::build(vocabulary)?),
            options,
            interpreter: None,
        })
    }

    /// Consult `interpreter` when neither the extractors nor the fallback
    /// grammar produce dates.
    pub fn with_interpreter(mut self, interpreter: Arc<dyn Interpreter>) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.tables.vocabulary
    }

    /// Resolve `text` against the reference date. Never fails: unrecognized
    /// or impossible input yields an empty, low-confidence result.
    pub fn resolve(&self, text: &str, reference: NaiveDate) -> ResolutionResult {
        let tables = &*self.tables;
        let normalized = normalize(text, &tables.vocabulary);
        trace!(normalized = normalized.as_str(), "normalized input");
        if normalized.is_empty() {
            return ResolutionResult::empty();
        }

        let hints = tables
            .slots
            .detect(normalized.as_str(), self.options.default_slot_minutes);
        let mut proposals = Vec::new();

        if let Some(parsed) = tables.extractors.extract(normalized.as_str(), reference) {
            let expression = self.source_expression(text, &normalized, &parsed);
            proposals.push(self.propose(&parsed, Some(expression), &hints, reference));
        } else {
            let english_text = translate(normalized.as_str(), &tables.vocabulary);
            trace!(translated = %english_text, "fallback translation");
            if let Some(parsed) = english::parse(&english_text, reference) {
                debug!(kind = ?parsed.kind(), span = ?parsed.span, "fallback grammar matched");
                let expression = TemporalExpression {
                    raw: english_text
                        .get(parsed.span.clone())
                        .unwrap_or_default()
                        .to_string(),
                    span: None,
                    markers: detect_markers(normalized.as_str(), &tables.vocabulary),
                };
                proposals.push(self.propose(&parsed, Some(expression), &hints, reference));
            }
            if proposals.iter().all(|p| p.dates.is_empty()) {
                if let Some(proposal) = self.consult_interpreter(text, reference) {
                    proposals.push(proposal);
                }
            }
        }

        let decision = arbitrate(proposals);
        match decision.winner {
            Some(winner) => ResolutionResult {
                resolved: winner.dates,
                confidence: decision.confidence,
                kind: winner.kind,
                source: Some(winner.origin),
                expression: winner.expression,
            },
            None => ResolutionResult::empty(),
        }
    }

    /// Check dates proposed by another collaborator (typically a generative
    /// model) against the deterministic reading of `text`.
    ///
    /// Malformed and past dates are always rejected. When the text has a
    /// deterministic reading, dates outside it are rejected too, and dates it
    /// denotes that were not proposed are reported as missing.
    pub fn check_dates<S: AsRef<str>>(
        &self,
        text: &str,
        reference: NaiveDate,
        proposed: &[S],
    ) -> DateCheck {
        let reading = self.resolve(text, reference);
        let mut accepted: Vec<String> = Vec::new();
        let mut rejected = Vec::new();

        for raw in proposed {
            let raw = raw.as_ref().trim();
            let reason = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Err(_) => Some(RejectionReason::Malformed),
                Ok(date) if !self.options.allow_past && date < reference => {
                    Some(RejectionReason::Past)
                }
                Ok(date) if !reading.is_empty() && !reading.resolved.iter().any(|r| r.date == date) => {
                    Some(RejectionReason::OutsideExpression)
                }
                Ok(date) => {
                    let iso = date.format("%Y-%m-%d").to_string();
                    if !accepted.contains(&iso) {
                        accepted.push(iso);
                    }
                    None
                }
            };
            if let Some(reason) = reason {
                debug!(date = raw, ?reason, "rejected proposed date");
                rejected.push(RejectedDate {
                    date: raw.to_string(),
                    reason,
                });
            }
        }

        let missing = reading
            .dates()
            .into_iter()
            .filter(|d| !accepted.contains(d))
            .collect();
        DateCheck {
            accepted,
            rejected,
            missing,
            confidence: reading.confidence,
        }
    }

    // ── Pipeline steps ──────────────────────────────────────────────────────

    fn source_expression(
        &self,
        text: &str,
        normalized: &NormalizedText,
        parsed: &ParsedConstruct,
    ) -> TemporalExpression {
        let span = normalized.source_span(parsed.span.clone());
        let matched = normalized.as_str().get(parsed.span.clone()).unwrap_or_default();
        TemporalExpression {
            raw: text.get(span.clone()).unwrap_or_default().to_string(),
            span: Some(span),
            markers: detect_markers(matched, &self.tables.vocabulary),
        }
    }

    fn propose(
        &self,
        parsed: &ParsedConstruct,
        expression: Option<TemporalExpression>,
        hints: &TimeHints,
        reference: NaiveDate,
    ) -> Proposal {
        let kind = parsed.kind();
        let shared = global_period(parsed, hints);
        let resolved = expand(&parsed.construct, reference, &self.options)
            .into_iter()
            .map(|occurrence| ResolvedDate {
                date: occurrence.date,
                kind: Some(kind),
                origin: parsed.origin,
                window: hints.explicit.or_else(|| {
                    occurrence
                        .period
                        .or(shared)
                        .map(|p| self.options.time_windows.window(p))
                }),
            })
            .collect();
        Proposal {
            origin: parsed.origin,
            kind: Some(kind),
            expression,
            dates: self.finish(resolved, reference),
        }
    }

    fn consult_interpreter(&self, text: &str, reference: NaiveDate) -> Option<Proposal> {
        let interpreter = self.interpreter.as_ref()?;
        let candidate = interpreter.interpret(text, reference)?;
        debug!(proposed = candidate.dates.len(), "interpreter answered");
        Some(Proposal {
            origin: Origin::Interpreter,
            kind: None,
            expression: None,
            dates: self.finish(candidate.into_resolved(), reference),
        })
    }

    /// Drop past dates, sort ascending, keep the first entry per date.
    fn finish(&self, mut resolved: Vec<ResolvedDate>, reference: NaiveDate) -> Vec<ResolvedDate> {
        if !self.options.allow_past {
            resolved.retain(|r| r.date >= reference);
        }
        resolved.sort_by_key(|r| r.date);
        resolved.dedup_by_key(|r| r.date);
        resolved
    }
}

/// The day period that applies to dates whose own item carried none.
///
/// Qualifiers inside an extracted weekday set belong to their items and were
/// already attached during expansion.
fn global_period(parsed: &ParsedConstruct, hints: &TimeHints) -> Option<DayPeriod> {
    let owned_by_items = matches!(parsed.construct, Construct::Weekdays { .. })
        && matches!(parsed.origin, Origin::Extractor(_));
    hints
        .periods
        .iter()
        .find(|(at, _)| !(owned_by_items && parsed.span.contains(at)))
        .map(|&(_, period)| period)
}

/// Resolve with the built-in French vocabulary.
pub fn resolve(text: &str, reference: NaiveDate, options: &ResolveOptions) -> ResolutionResult {
    Resolver::new(options.clone()).resolve(text, reference)
}

// ── Tests ───────────────────────────────────────────────────────────────────
