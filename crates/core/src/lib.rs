//! # Recollect Core
//!
//! Domain types, traits, and error definitions for the Recollect agent
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! The three pillars of this crate:
//! - **Structured extraction**: repairing near-JSON model output into a
//!   required-key-validated [`StructuredRecord`]
//! - **Bounded retry**: the [`with_retry`] combinator shared by every call
//!   site that needs a validated record from an unreliable generator
//! - **The generator seam**: the [`Generator`] trait the agent calls
//!   through, so providers are swappable and tests can script outputs

pub mod error;
pub mod extract;
pub mod gateway;
pub mod message;
pub mod notes;
pub mod record;
pub mod retry;

// Re-export key types at crate root for ergonomics
pub use error::{AttemptFailure, Error, ExtractionFailure, GatewayError, Result, RetryExhausted};
pub use extract::extract;
pub use gateway::{GenerationParams, Generator};
pub use message::{Conversation, ConversationId, Message, Role};
pub use notes::Notes;
pub use record::{
    NotesRecord, RecordShape, ResponseRecord, ScaffoldRecord, StructuredRecord, NOTES_KEYS,
    RESPONSE_KEYS, SCAFFOLD_KEYS,
};
pub use retry::{with_retry, with_retry_as};
