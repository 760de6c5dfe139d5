//! Prompt templates.
//!
//! Every template that expects a structured reply spells out the exact
//! JSON object shape and nothing else; required-key validation downstream
//! is what makes these instructions enforceable.

/// System framing for an agent with no memory.
pub fn base_system(max_tokens: u32) -> String {
    format!(
        "You are a collaborative assistant helping a user work through a problem.\n\
         Always reply with a single JSON object of the form\n\
         {{\"reasoning\": \"<your private step-by-step thinking>\", \"response\": \"<the reply shown to the user>\"}}\n\
         and nothing else. Do not wrap the object in markdown fences or add commentary around it.\n\
         The reasoning field is never shown to the user. Keep the response under {max_tokens} tokens."
    )
}

/// System framing when a fixed set of user preferences is known up front.
pub fn system_with_preferences(max_tokens: u32, user_preferences: &str) -> String {
    format!(
        "{base}\n\n\
         The user has stated the following preferences. Follow them in every response:\n\
         {user_preferences}",
        base = base_system(max_tokens)
    )
}

/// System framing for an agent carrying evolving notes about the user.
pub fn reflective_system(max_tokens: u32, agent_notes: &str) -> String {
    format!(
        "{base}\n\n\
         Across past conversations you have been taking notes on this user's preferences.\n\
         Your current notes:\n\
         {agent_notes}\n\n\
         Apply whatever in these notes is relevant to the conversation at hand.",
        base = base_system(max_tokens)
    )
}

/// Instruction prepended to the first user turn in raw scaffolding mode.
/// The entire notes blob follows.
pub fn raw_injection(agent_notes: &str) -> String {
    format!(
        "Remember, you have been taking notes throughout past conversations about user \
         preferences. Use whatever is relevant in these notes to guide your response:\n\
         {agent_notes}\n\n"
    )
}

/// Instruction prepended to the first user turn in model-mediated mode.
/// Only the filtered excerpt follows.
pub fn mediated_injection(relevant_notes: &str) -> String {
    format!(
        "Remember, you have been taking notes throughout past conversations about user \
         preferences. Use these notes to guide your response:\n\
         {relevant_notes}\n\n"
    )
}

/// One-shot prompt asking the model to filter the full notes down to what
/// the upcoming conversation needs.
pub fn scaffold_filter(conversation_history: &str, complete_agent_notes: &str) -> String {
    format!(
        "You are preparing an assistant for the next turn of a conversation. Below are the \
         complete notes the assistant has accumulated about this user's preferences, followed \
         by the conversation so far.\n\n\
         Complete notes:\n{complete_agent_notes}\n\n\
         Conversation so far:\n{conversation_history}\n\n\
         Select only the notes relevant to the upcoming turn. You may rewrite or condense them, \
         but do not invent preferences that are not in the notes.\n\
         Reply with a single JSON object of the form\n\
         {{\"reasoning\": \"<why these notes are the relevant ones>\", \"relevant_notes\": \"<the filtered notes>\"}}\n\
         and nothing else."
    )
}

/// One-shot prompt asking the model to rewrite the notes after a session.
///
/// The prior notes are part of the input: the model is trusted to carry
/// forward anything still relevant, so the result replaces them in full.
pub fn update_notes(agent_notes: &str, conversation_str: &str) -> String {
    format!(
        "You maintain a running set of notes about a user's preferences, learned across \
         conversations. Here are your notes so far:\n{agent_notes}\n\n\
         Here is the full transcript of the conversation that just ended:\n{conversation_str}\n\n\
         Rewrite the notes. Keep everything from the prior notes that still holds, fold in any \
         preferences the user expressed or implied in this conversation, and drop anything the \
         conversation contradicted. The new notes fully replace the old ones.\n\
         Reply with a single JSON object of the form\n\
         {{\"user_preferences_reasoning\": \"<what this conversation revealed>\", \"agent_notes\": \"<the complete new notes>\"}}\n\
         and nothing else."
    )
}
