//! Structured records — required-key-validated mappings extracted from
//! model output.
//!
//! The model is instructed to emit a flat near-JSON object; after repair
//! and parsing we get a [`StructuredRecord`]. Each retrying call site
//! declares its required-key set as a named constant and its typed shape
//! via [`RecordShape`] — key presence is the only validated contract, no
//! schema versioning.

use serde_json::{Map, Value};

/// Required keys for a conversation-turn response.
pub const RESPONSE_KEYS: &[&str] = &["reasoning", "response"];

/// Required keys for a notes-consolidation result.
pub const NOTES_KEYS: &[&str] = &["user_preferences_reasoning", "agent_notes"];

/// Required keys for a model-mediated scaffolding result.
pub const SCAFFOLD_KEYS: &[&str] = &["reasoning", "relevant_notes"];

/// A mapping from string keys to values, produced by repairing/parsing
/// model output.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRecord(Map<String, Value>);

impl StructuredRecord {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The required keys absent from this record's top level, in the
    /// order the required set lists them.
    pub fn missing_keys(&self, required_keys: &[&str]) -> Vec<String> {
        required_keys
            .iter()
            .filter(|k| !self.0.contains_key(**k))
            .map(|k| k.to_string())
            .collect()
    }

    /// The value under `key` rendered as text.
    ///
    /// String values come back as-is; any other value (the model sometimes
    /// nests objects where prose was asked for) is rendered as compact JSON
    /// rather than rejected, since presence is the only contract.
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// A typed view over a validated record.
///
/// Implementors name their required-key set; `from_record` is only called
/// on records the retry loop has already validated against that set.
pub trait RecordShape: Sized {
    const REQUIRED_KEYS: &'static [&'static str];

    fn from_record(record: &StructuredRecord) -> Self;
}

/// The `{reasoning, response}` shape returned for every conversation turn.
///
/// `reasoning` is a scratchpad that is never surfaced to the end user;
/// `response` is the only caller-visible field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub reasoning: String,
    pub response: String,
}

impl RecordShape for ResponseRecord {
    const REQUIRED_KEYS: &'static [&'static str] = RESPONSE_KEYS;

    fn from_record(record: &StructuredRecord) -> Self {
        Self {
            reasoning: record.text("reasoning").unwrap_or_default(),
            response: record.text("response").unwrap_or_default(),
        }
    }
}

/// The `{user_preferences_reasoning, agent_notes}` shape produced by
/// consolidation. `agent_notes` supersedes the prior notes in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesRecord {
    pub user_preferences_reasoning: String,
    pub agent_notes: String,
}

impl RecordShape for NotesRecord {
    const REQUIRED_KEYS: &'static [&'static str] = NOTES_KEYS;

    fn from_record(record: &StructuredRecord) -> Self {
        Self {
            user_preferences_reasoning: record
                .text("user_preferences_reasoning")
                .unwrap_or_default(),
            agent_notes: record.text("agent_notes").unwrap_or_default(),
        }
    }
}

/// The `{reasoning, relevant_notes}` shape produced by model-mediated
/// scaffolding: a filtered excerpt of the notes scoped to the upcoming
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRecord {
    pub reasoning: String,
    pub relevant_notes: String,
}

impl RecordShape for ScaffoldRecord {
    const REQUIRED_KEYS: &'static [&'static str] = SCAFFOLD_KEYS;

    fn from_record(record: &StructuredRecord) -> Self {
        Self {
            reasoning: record.text("reasoning").unwrap_or_default(),
            relevant_notes: record.text("relevant_notes").unwrap_or_default(),
        }
    }
}
