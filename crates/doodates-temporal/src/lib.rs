//! # doodates-temporal
//!
//! Deterministic resolution of French scheduling requests into poll dates.
//!
//! Free-form text such as "tous les samedis de mars 2026", "début avril" or
//! "vendredi soir ou samedi matin" is turned into an ascending list of ISO
//! dates, optional time slots, and a confidence label. Resolution never
//! fails: text without a usable date yields an empty, low-confidence result.
//!
//! ## Modules
//!
//! - [`resolver`] — The pipeline: [`Resolver`], [`resolve`], date checking
//! - [`vocabulary`] — French weekday, month, day-period, synonym and translation tables
//! - [`normalize`] — Case/diacritic folding and synonym collapsing with source spans
//! - [`construct`] — Parsed constructs, temporal expressions, resolved dates
//! - [`translate`] — Fallback French → English phrase translation
//! - [`english`] — English date grammar used by the fallback path
//! - [`arbiter`] — Precedence and confidence between resolution strategies
//! - [`interpreter`] — Optional injected interpreter (e.g. a generative model)
//! - [`slots`] — Time slots in the external output shape
//! - [`recurrence`] — Weekly RRULE expansion over a date span
//! - [`calendar`] — Reference dates and local calendar arithmetic
//! - [`options`] — Resolution options
//! - [`error`] — Error types

pub mod arbiter;
pub mod calendar;
pub mod construct;
pub mod english;
pub mod error;
mod expand;
mod extract;
pub mod interpreter;
pub mod normalize;
pub mod options;
pub mod recurrence;
pub mod resolver;
pub mod slots;
pub mod translate;
pub mod vocabulary;

pub use arbiter::Confidence;
pub use calendar::{parse_reference_date, reference_date_in};
pub use construct::{
    ConstructKind, DayPeriod, ExtractorId, LanguageMarker, Origin, ResolvedDate,
    TemporalExpression, TimeWindow,
};
pub use error::ResolverError;
pub use interpreter::{Candidate, Interpreter};
pub use options::{ResolveOptions, TodayPolicy, WeekStartDay};
pub use resolver::{
    resolve, DateCheck, RejectedDate, RejectionReason, ResolutionOutput, ResolutionResult,
    Resolver,
};
pub use slots::TimeSlot;
pub use vocabulary::Vocabulary;
