//! Notes — the evolving, fully-rewritable summary of learned user
//! preferences carried across sessions.
//!
//! Lifecycle: created empty, populated by the first successful
//! consolidation, and **overwritten in full** by every subsequent one. The
//! consolidating model receives the prior notes as input and is trusted to
//! carry forward whatever is still relevant; nothing here merges. The
//! caller owns the single canonical Notes value and threads it explicitly
//! between session boundaries — there is no ambient registry.

use serde::{Deserialize, Serialize};

/// Seed text handed to the consolidator the first time around, when no
/// preferences have been learned yet.
pub const SEED_NOTES: &str = "Initial notes: No preferences learned yet.";

/// The notes blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notes(String);

impl Notes {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Empty notes, the state before any consolidation has succeeded.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The text to embed in a consolidation prompt: the notes themselves,
    /// or the seed text when nothing has been learned yet.
    pub fn for_consolidation(&self) -> &str {
        if self.is_empty() {
            SEED_NOTES
        } else {
            &self.0
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<String> for Notes {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Notes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_notes_consolidate_from_seed() {
        let notes = Notes::empty();
        assert!(notes.is_empty());
        assert_eq!(notes.for_consolidation(), SEED_NOTES);
    }

    #[test]
    fn populated_notes_consolidate_from_themselves() {
        let notes = Notes::new("User prefers Python.");
        assert_eq!(notes.for_consolidation(), "User prefers Python.");
    }

    #[test]
    fn notes_serialize_transparently() {
        let notes = Notes::new("prefers camelCase");
        let json = serde_json::to_string(&notes).unwrap();
        assert_eq!(json, "\"prefers camelCase\"");
    }
}
