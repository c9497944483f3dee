//! Configuration types and defaults for the annotator
//!
//! Everything the hosting page injects at load time: the initial record, the
//! endpoint addresses, the hotkey map, and the DOM contract.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::AnnotationRecord;

/// Default keyword save delay (milliseconds)
pub const DEFAULT_DEBOUNCE_MS: u32 = 10;

/// Default prompt shown when leaving a document with unlabeled candidates
pub const DEFAULT_CONFIRM_MESSAGE: &str =
    "Are you sure you want to leave\nthis document without a judgment?";

// =============================================================================
// DOM Selectors
// =============================================================================

/// Class names and element ids the controller binds to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomSelectors {
    /// Marker class of candidate elements
    pub candidate_class: String,
    /// Prefix stripped from a candidate element id to get its identifier
    pub candidate_id_prefix: String,
    /// Element hosting the keyword chips
    pub keywords_row_id: String,
    /// Keyword free-text input
    pub keyword_input_id: String,
    /// Busy indicator
    pub spinner_id: String,
    /// "Next document" link
    pub next_link_id: String,
    /// "Previous document" link
    pub prev_link_id: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            candidate_class: "pa-candidate".to_string(),
            candidate_id_prefix: "candidate-".to_string(),
            keywords_row_id: "keywords-row".to_string(),
            keyword_input_id: "keyword-input".to_string(),
            spinner_id: "spinner".to_string(),
            next_link_id: "nav-next-link".to_string(),
            prev_link_id: "nav-prev-link".to_string(),
        }
    }
}

impl DomSelectors {
    /// Candidate identifier for an element id (prefix stripped when present)
    pub fn candidate_id<'a>(&self, element_id: &'a str) -> &'a str {
        element_id
            .strip_prefix(self.candidate_id_prefix.as_str())
            .unwrap_or(element_id)
    }
}

// =============================================================================
// Pick Ordering
// =============================================================================

/// How concurrent pick responses are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickOrdering {
    /// Apply every response in arrival order
    #[default]
    LastResponseWins,
    /// Drop responses to picks older than one already applied
    LastRequestWins,
}

// =============================================================================
// Annotator Configuration
// =============================================================================

/// Host-supplied annotator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Initial annotation record rendered by the server
    #[serde(default)]
    pub metadata: AnnotationRecord,
    /// Pick endpoint (absolute or origin-relative)
    pub pick_url: String,
    /// Keyword-save endpoint (absolute or origin-relative)
    pub save_keywords_url: String,
    /// Key (as in `KeyboardEvent.key`) -> candidate identifier
    #[serde(default)]
    pub hotkeys: HashMap<String, String>,
    #[serde(default)]
    pub selectors: DomSelectors,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    #[serde(default = "default_confirm_message")]
    pub confirm_message: String,
    #[serde(default)]
    pub pick_ordering: PickOrdering,
}

fn default_debounce_ms() -> u32 {
    DEFAULT_DEBOUNCE_MS
}

fn default_confirm_message() -> String {
    DEFAULT_CONFIRM_MESSAGE.to_string()
}

impl AnnotatorConfig {
    pub fn new(pick_url: impl Into<String>, save_keywords_url: impl Into<String>) -> Self {
        Self {
            metadata: AnnotationRecord::default(),
            pick_url: pick_url.into(),
            save_keywords_url: save_keywords_url.into(),
            hotkeys: HashMap::new(),
            selectors: DomSelectors::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            confirm_message: default_confirm_message(),
            pick_ordering: PickOrdering::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: AnnotationRecord) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_hotkey(mut self, key: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        self.hotkeys.insert(key.into(), candidate_id.into());
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_pick_ordering(mut self, ordering: PickOrdering) -> Self {
        self.pick_ordering = ordering;
        self
    }

    /// Parse from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pick_url.trim().is_empty() {
            return Err(ConfigError::Missing("pickUrl"));
        }
        if self.save_keywords_url.trim().is_empty() {
            return Err(ConfigError::Missing("saveKeywordsUrl"));
        }
        Ok(())
    }
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required field is absent or empty
    Missing(&'static str),
    /// The host value could not be decoded
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "Missing configuration field: {}", field),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for wasm_bindgen::JsValue {
    fn from(err: ConfigError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
