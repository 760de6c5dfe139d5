//! Scaffolding Composer — deciding what portion of accumulated notes to
//! inject into the next turn.
//!
//! Raw mode prepends a fixed instruction plus the entire notes blob: no
//! model call, cannot fail. Model-mediated mode spends one extra
//! round-trip asking the model to filter the notes down to what the
//! upcoming turn needs; if that round-trip exhausts its retry budget, the
//! turn proceeds with no injection at all — answering without memory beats
//! not answering.

use recollect_config::ScaffoldingMode;
use recollect_core::record::ScaffoldRecord;
use recollect_core::retry::with_retry_as;
use recollect_core::{Conversation, Message, Notes};
use tracing::{debug, warn};

use crate::agent::{CollaboratorAgent, MemoryMode};
use crate::prompts;

impl CollaboratorAgent {
    /// The injection text for the first user turn, or `None` when this
    /// agent's memory mode injects nothing (or mediated filtering failed).
    pub(crate) async fn scaffold_injection(&self, conversation: &Conversation) -> Option<String> {
        let MemoryMode::EvolvingNotes { notes, scaffolding } = &self.config.memory else {
            return None;
        };
        if notes.is_empty() {
            return None;
        }

        let notes_text = self.clipped_notes(notes);

        match scaffolding {
            ScaffoldingMode::Raw => Some(prompts::raw_injection(notes_text)),
            ScaffoldingMode::ModelMediated => self.mediated_injection(conversation, notes_text).await,
        }
    }

    /// Ask the model for the notes relevant to the upcoming turn.
    async fn mediated_injection(
        &self,
        conversation: &Conversation,
        notes_text: &str,
    ) -> Option<String> {
        let prompt = prompts::scaffold_filter(&conversation.transcript(), notes_text);
        let messages = vec![Message::user(prompt)];

        let result = with_retry_as::<ScaffoldRecord, _, _>(self.config.retry_budget, || {
            self.gateway.generate(&messages, &self.config.params)
        })
        .await;

        match result {
            Ok(record) => {
                debug!(
                    relevant_len = record.relevant_notes.len(),
                    "Mediated scaffolding selected notes"
                );
                Some(prompts::mediated_injection(&record.relevant_notes))
            }
            Err(e) => {
                // Degrade: the turn still proceeds, just without memory.
                warn!(error = %e, "Mediated scaffolding exhausted, proceeding without injection");
                None
            }
        }
    }

    /// Notes text bounded by the injection ceiling. Keeps the tail: each
    /// consolidation rewrites the whole blob, so late text is the most
    /// recently curated.
    fn clipped_notes<'a>(&self, notes: &'a Notes) -> &'a str {
        clip_tail(notes.as_str(), self.config.max_inject_chars)
    }
}

fn clip_tail(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return text;
    }
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    warn!(
        total_chars = total,
        max_chars, "Notes exceed injection ceiling, clipping from the front"
    );
    let start = text
        .char_indices()
        .nth(total - max_chars)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &text[start..]
}
