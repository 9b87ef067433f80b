//! Resolution outcomes.

use serde::Serialize;

/// Result of resolving a lookup key against PubMed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    /// Exactly one record matched
    Resolved { pmid: String },
    /// No record, or more than one record, matched
    Unresolved,
}

impl ResolutionOutcome {
    /// Interpret a candidate list: only a single candidate resolves.
    pub fn from_candidates(candidates: Vec<String>) -> Self {
        match <[String; 1]>::try_from(candidates) {
            Ok([pmid]) => ResolutionOutcome::Resolved { pmid },
            Err(_) => ResolutionOutcome::Unresolved,
        }
    }

    pub fn pmid(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Resolved { pmid } => Some(pmid),
            ResolutionOutcome::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionOutcome::Resolved { .. })
    }
}
