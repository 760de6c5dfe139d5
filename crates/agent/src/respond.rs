//! Conversation Responder — one structured turn.

use recollect_core::record::ResponseRecord;
use recollect_core::retry::with_retry_as;
use recollect_core::{Conversation, Message, RetryExhausted};
use tracing::{debug, info};

use crate::agent::CollaboratorAgent;

impl CollaboratorAgent {
    /// Generate the assistant's reply to the conversation so far.
    ///
    /// The caller's conversation is deep-copied, never mutated. Scaffolding
    /// (when the memory mode calls for it) is applied exactly once to the
    /// copy — retry attempts regenerate from the same scaffolded messages,
    /// they never re-scaffold. Only the `response` field of the validated
    /// record is returned; the `reasoning` scratchpad exists to elicit
    /// better-grounded answers and is discarded here.
    ///
    /// On retry exhaustion the error names the required keys and final
    /// cause; the caller substitutes its own user-facing fallback.
    pub async fn respond(
        &self,
        conversation: &Conversation,
    ) -> Result<String, RetryExhausted> {
        let mut working = conversation.clone();

        if let Some(injection) = self.scaffold_injection(&working).await {
            match working.first_user_index() {
                Some(i) => {
                    let original = std::mem::take(&mut working.messages[i].content);
                    working.messages[i].content = format!("{injection}{original}");
                }
                None => debug!("No user turn to scaffold, skipping injection"),
            }
        }

        let mut messages = Vec::with_capacity(working.messages.len() + 1);
        messages.push(Message::system(&self.system_framing));
        messages.extend(working.messages);

        info!(
            conversation_id = %conversation.id,
            messages = messages.len(),
            "Generating structured response"
        );

        let record = with_retry_as::<ResponseRecord, _, _>(self.config.retry_budget, || {
            self.gateway.generate(&messages, &self.config.params)
        })
        .await?;

        Ok(record.response)
    }
}
