//! The Recollect agent — structured conversation turns over an unreliable
//! generator, with an evolving preference memory.
//!
//! A [`CollaboratorAgent`] is immutable once constructed: its memory mode,
//! notes, and generation parameters are fixed for its lifetime. The caller
//! owns the canonical notes value; after a session it runs
//! [`CollaboratorAgent::consolidate`] and constructs the *next* agent
//! instance from the returned notes. No in-place mutation of an in-flight
//! agent ever affects past responses.
//!
//! Per turn:
//! 1. Deep-copy the caller's conversation (caller state is never touched)
//! 2. In evolving-notes mode, scaffold the first user turn with whatever
//!    portion of the notes the scaffolding mode selects
//! 3. Prepend the system framing and drive the bounded retry loop until a
//!    valid `{reasoning, response}` record comes back
//! 4. Surface only `response`; the reasoning scratchpad is discarded

pub mod agent;
pub mod consolidate;
pub mod prompts;
pub mod respond;
pub mod scaffold;

#[cfg(test)]
pub(crate) mod test_support;

pub use agent::{AgentConfig, CollaboratorAgent, MemoryMode};
pub use recollect_config::ScaffoldingMode;
