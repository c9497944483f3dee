//! Annotation record and derived candidate state
//!
//! The record mirrors a document's judgment state on the server. It is only
//! ever replaced wholesale by endpoint responses; labels are derived from it.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Annotation Record
// =============================================================================

/// In-memory mirror of a document's judgment state
///
/// Unknown fields in the host metadata (candidate id, annotation sets, ...)
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Accepted candidate identifiers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accepted: Vec<String>,
    /// Rejected candidate identifiers
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rejected: Vec<String>,
    /// Raw comma-separated keyword string; `None` when the host supplied none
    /// or something other than a string
    #[serde(default, deserialize_with = "string_or_none")]
    pub keywords: Option<String>,
}

/// `null` id lists read as empty
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any non-string keyword value reads as absent
fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(keywords) => Ok(Some(keywords)),
        _ => Ok(None),
    }
}

impl AnnotationRecord {
    pub fn new(accepted: Vec<String>, rejected: Vec<String>, keywords: Option<String>) -> Self {
        Self {
            accepted,
            rejected,
            keywords,
        }
    }

    /// Derive the display label of a candidate.
    ///
    /// Accepted takes precedence over rejected.
    pub fn label_for(&self, candidate_id: &str) -> CandidateLabel {
        if self.accepted.iter().any(|id| id == candidate_id) {
            CandidateLabel::Accepted
        } else if self.rejected.iter().any(|id| id == candidate_id) {
            CandidateLabel::Rejected
        } else {
            CandidateLabel::Incomplete
        }
    }

    /// Replace accepted/rejected with the server's view
    pub fn apply_pick(&mut self, response: &PickResponse) {
        self.accepted = response.accepted.clone();
        self.rejected = response.rejected.clone();
    }

    /// Replace the keyword string with the server's canonical form
    pub fn apply_keywords(&mut self, response: &KeywordsResponse) {
        self.keywords = Some(response.keywords.clone());
    }
}

// =============================================================================
// Candidate Label
// =============================================================================

/// Three-way display state of a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateLabel {
    Accepted,
    Rejected,
    Incomplete,
}

impl CandidateLabel {
    pub const ALL: [CandidateLabel; 3] = [
        CandidateLabel::Accepted,
        CandidateLabel::Rejected,
        CandidateLabel::Incomplete,
    ];

    /// CSS class carried by a candidate element in this state
    pub fn class_name(&self) -> &'static str {
        match self {
            CandidateLabel::Accepted => "accepted",
            CandidateLabel::Rejected => "rejected",
            CandidateLabel::Incomplete => "incomplete",
        }
    }

    pub fn is_labeled(&self) -> bool {
        !matches!(self, CandidateLabel::Incomplete)
    }
}

// =============================================================================
// Endpoint Payloads
// =============================================================================

/// Pick endpoint response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickResponse {
    #[serde(default)]
    pub accepted: Vec<String>,
    #[serde(default)]
    pub rejected: Vec<String>,
}

/// Keyword-save endpoint response body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordsResponse {
    pub keywords: String,
}

// =============================================================================
// Busy Counter
// =============================================================================

/// Count of in-flight remote operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyCounter {
    count: u32,
}

impl BusyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) -> u32 {
        self.count += 1;
        self.count
    }

    /// Saturates at zero
    pub fn decrement(&mut self) -> u32 {
        self.count = self.count.saturating_sub(1);
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_busy(&self) -> bool {
        self.count > 0
    }
}
