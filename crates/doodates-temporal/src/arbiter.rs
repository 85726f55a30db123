//! Conflict arbitration between the resolution strategies.
//!
//! Precedence is fixed: pattern extractor, then fallback grammar, then an
//! injected interpreter. A pattern extractor proposal wins even when it
//! resolved to nothing, since the input was understood and its dates were
//! impossible or past. The other sources only count when they produced
//! dates. A single pass, no retries.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::construct::{ConstructKind, Origin, ResolvedDate, TemporalExpression};

/// How directly a result was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// The dates one strategy came up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    pub origin: Origin,
    pub kind: Option<ConstructKind>,
    pub expression: Option<TemporalExpression>,
    pub dates: Vec<ResolvedDate>,
}

/// The winning proposal, if any, and its confidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub winner: Option<Proposal>,
    pub confidence: Confidence,
}

/// Pick the proposal to report.
pub fn arbitrate(proposals: Vec<Proposal>) -> Decision {
    let winner = proposals
        .into_iter()
        .filter(|p| matches!(p.origin, Origin::Extractor(_)) || !p.dates.is_empty())
        .min_by_key(|p| precedence(p.origin));

    let confidence = match &winner {
        None => Confidence::Low,
        Some(p) if p.dates.is_empty() => Confidence::Low,
        Some(p) => match p.origin {
            Origin::Extractor(_) => Confidence::High,
            Origin::Fallback | Origin::Interpreter => Confidence::Medium,
        },
    };
    debug!(
        origin = ?winner.as_ref().map(|p| p.origin),
        ?confidence,
        "arbitration"
    );
    Decision { winner, confidence }
}

fn precedence(origin: Origin) -> u8 {
    match origin {
        Origin::Extractor(_) => 0,
        Origin::Fallback => 1,
        Origin::Interpreter => 2,
    }
}
