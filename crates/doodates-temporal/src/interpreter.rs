//! Optional interpreter capability, typically backed by a generative model.
//!
//! The resolver never depends on one: an interpreter is injected explicitly,
//! consulted only when the deterministic strategies found nothing, and its
//! candidates are validated like any other date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::construct::{Origin, ResolvedDate, TimeWindow};
use crate::error::{ResolverError, Result};
use crate::slots::TimeSlot;

/// Proposes dates for text the deterministic grammar could not read.
pub trait Interpreter: Send + Sync {
    fn interpret(&self, text: &str, reference: NaiveDate) -> Option<Candidate>;
}

impl<F> Interpreter for F
where
    F: Fn(&str, NaiveDate) -> Option<Candidate> + Send + Sync,
{
    fn interpret(&self, text: &str, reference: NaiveDate) -> Option<Candidate> {
        self(text, reference)
    }
}

/// Dates and time slots proposed by an interpreter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
}

impl Candidate {
    /// Parse a candidate from model output.
    ///
    /// Accepts a bare JSON object or one wrapped in a Markdown code fence.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::InvalidCandidate`] if the payload is not a
    /// candidate object.
    pub fn from_json(payload: &str) -> Result<Self> {
        let body = strip_code_fence(payload);
        serde_json::from_str(body).map_err(|e| ResolverError::InvalidCandidate(e.to_string()))
    }

    /// Turn the candidate into resolved dates, dropping malformed entries.
    pub(crate) fn into_resolved(self) -> Vec<ResolvedDate> {
        let mut windows: BTreeMap<String, TimeWindow> = BTreeMap::new();
        let mut shared: Option<TimeWindow> = None;
        for slot in &self.time_slots {
            let Some(window) = slot.window() else {
                debug!(start = %slot.start, end = %slot.end, "dropping malformed slot");
                continue;
            };
            match &slot.dates {
                Some(dates) => {
                    for date in dates {
                        windows.entry(date.clone()).or_insert(window);
                    }
                }
                None => shared = shared.or(Some(window)),
            }
        }

        self.dates
            .iter()
            .filter_map(|raw| {
                let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
                if date.is_none() {
                    debug!(date = %raw, "dropping malformed candidate date");
                }
                Some(ResolvedDate {
                    date: date?,
                    kind: None,
                    origin: Origin::Interpreter,
                    window: windows.get(raw.trim()).copied().or(shared),
                })
            })
            .collect()
    }
}

fn strip_code_fence(payload: &str) -> &str {
    let trimmed = payload.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
