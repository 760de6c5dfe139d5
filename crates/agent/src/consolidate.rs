//! Memory Consolidator — deriving new notes from prior notes plus a
//! completed conversation.
//!
//! The returned notes supersede the prior notes in full. The model sees
//! the prior notes as part of its input and is trusted to carry forward
//! whatever is still relevant; nothing here merges. On retry exhaustion
//! the caller must keep the prior notes unchanged — memory is never
//! silently reset by a failed consolidation.

use recollect_core::record::NotesRecord;
use recollect_core::retry::with_retry_as;
use recollect_core::{Conversation, Message, Notes, RetryExhausted};
use tracing::info;

use crate::agent::CollaboratorAgent;
use crate::prompts;

impl CollaboratorAgent {
    /// Rewrite `prior_notes` in light of the completed `conversation`.
    ///
    /// When `prior_notes` is empty (first consolidation), the seed text is
    /// embedded in its place. The conversation is read, flattened, and
    /// discarded — the agent retains nothing.
    pub async fn consolidate(
        &self,
        prior_notes: &Notes,
        conversation: &Conversation,
    ) -> Result<Notes, RetryExhausted> {
        let prompt =
            prompts::update_notes(prior_notes.for_consolidation(), &conversation.transcript());
        let messages = vec![Message::user(prompt)];

        let record = with_retry_as::<NotesRecord, _, _>(self.config.retry_budget, || {
            self.gateway.generate(&messages, &self.config.params)
        })
        .await?;

        info!(
            conversation_id = %conversation.id,
            prior_len = prior_notes.len(),
            new_len = record.agent_notes.len(),
            "Consolidated notes"
        );

        Ok(Notes::new(record.agent_notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentConfig, MemoryMode};
    use crate::test_support::ScriptedGenerator;
    use recollect_core::notes::SEED_NOTES;
    use std::sync::Arc;

    fn agent(gateway: Arc<ScriptedGenerator>) -> CollaboratorAgent {
        CollaboratorAgent::new(
            gateway,
            AgentConfig::new("m", MemoryMode::None).with_retry_budget(3),
        )
    }

    fn session() -> Conversation {
        let mut conv = Conversation::new();
        conv.push(Message::user("Please always use camelCase in examples."));
        conv.push(Message::assistant("Noted, camelCase it is."));
        conv
    }

    #[tokio::test]
    async fn success_returns_replacement_notes() {
        let gateway = Arc::new(ScriptedGenerator::new(vec![Ok(
            r#"{"user_preferences_reasoning": "asked for camelCase",
                "agent_notes": "User prefers camelCase naming."}"#
                .into(),
        )]));
        let agent = agent(gateway.clone());

        let prior = Notes::new("User prefers Python.");
        let updated = agent.consolidate(&prior, &session()).await.unwrap();

        assert_eq!(updated.as_str(), "User prefers camelCase naming.");
        // Prior notes and full transcript were both in the prompt
        let sent = gateway.request(0);
        assert!(sent[0].content.contains("User prefers Python."));
        assert!(sent[0].content.contains("User: Please always use camelCase"));
        assert!(sent[0].content.contains("Assistant: Noted, camelCase it is."));
    }

    #[tokio::test]
    async fn empty_prior_notes_use_the_seed_text() {
        let gateway = Arc::new(ScriptedGenerator::new(vec![Ok(
            r#"{"user_preferences_reasoning": "first session", "agent_notes": "Likes brevity."}"#
                .into(),
        )]));
        let agent = agent(gateway.clone());

        let updated = agent.consolidate(&Notes::empty(), &session()).await.unwrap();
        assert_eq!(updated.as_str(), "Likes brevity.");
        assert!(gateway.request(0)[0].content.contains(SEED_NOTES));
    }

    #[tokio::test]
    async fn exhaustion_signals_no_update() {
        let gateway = Arc::new(ScriptedGenerator::repeating(
            r#"{"user_preferences_reasoning": "missing the notes key"}"#,
        ));
        let agent = agent(gateway.clone());

        let prior = Notes::new("User prefers Python.");
        let err = agent.consolidate(&prior, &session()).await.unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(
            err.required_keys,
            vec!["user_preferences_reasoning", "agent_notes"]
        );
        // Caller-side discipline: prior notes remain the canonical value
        assert_eq!(prior.as_str(), "User prefers Python.");
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test]
    async fn lifecycle_overwrites_across_sessions() {
        // Session 1 populates, session 2 overwrites carrying the old
        // preference forward
        let gateway = Arc::new(ScriptedGenerator::new(vec![
            Ok(r#"{"user_preferences_reasoning": "s1", "agent_notes": "Prefers Python."}"#.into()),
            Ok(r#"{"user_preferences_reasoning": "s2",
                   "agent_notes": "Prefers Python. Prefers camelCase."}"#
                .into()),
        ]));
        let agent = agent(gateway.clone());

        let after_one = agent.consolidate(&Notes::empty(), &session()).await.unwrap();
        assert_eq!(after_one.as_str(), "Prefers Python.");

        let after_two = agent.consolidate(&after_one, &session()).await.unwrap();
        // Carry-forward is validated, not merely assumed
        assert!(after_two.as_str().contains("Prefers Python."));
        assert!(after_two.as_str().contains("camelCase"));
        assert!(gateway.request(1)[0].content.contains("Prefers Python."));
    }
}
