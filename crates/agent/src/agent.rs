//! Agent configuration and construction.

use std::sync::Arc;

use recollect_config::{AppConfig, ScaffoldingMode};
use recollect_core::{GenerationParams, Generator, Notes};

use crate::prompts;

/// What kind of memory governs the agent's system framing.
///
/// Exactly one of fixed preferences or notes applies at a time; the sum
/// type makes the alternative unrepresentable. Notes exist only in
/// evolving mode.
#[derive(Debug, Clone)]
pub enum MemoryMode {
    /// Stateless assistant, no preference memory of any kind.
    None,

    /// A fixed preference text known up front, embedded into the framing
    /// and never updated.
    FixedPreferences(String),

    /// Evolving notes, consolidated after each session and re-injected
    /// per the scaffolding mode.
    EvolvingNotes {
        notes: Notes,
        scaffolding: ScaffoldingMode,
    },
}

/// Immutable per-instance configuration.
///
/// A new configuration (hence a new agent instance) is constructed
/// whenever notes are updated.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Generation parameters for every gateway call this agent makes
    pub params: GenerationParams,

    /// Full-regeneration attempts per structured record
    pub retry_budget: usize,

    /// Memory mode
    pub memory: MemoryMode,

    /// Character ceiling on notes injected into prompts; 0 disables
    pub max_inject_chars: usize,
}

impl AgentConfig {
    /// Config with the runtime defaults for the given model and memory mode.
    pub fn new(model: impl Into<String>, memory: MemoryMode) -> Self {
        Self {
            params: GenerationParams::for_model(model),
            retry_budget: 10,
            memory,
            max_inject_chars: 16 * 1024,
        }
    }

    /// Config derived from an [`AppConfig`].
    pub fn from_app_config(config: &AppConfig, memory: MemoryMode) -> Self {
        Self {
            params: config.generation_params(),
            retry_budget: config.retry.budget,
            memory,
            max_inject_chars: config.scaffolding.max_inject_chars,
        }
    }

    pub fn with_retry_budget(mut self, budget: usize) -> Self {
        self.retry_budget = budget;
        self
    }

    pub fn with_max_inject_chars(mut self, chars: usize) -> Self {
        self.max_inject_chars = chars;
        self
    }
}

/// The conversational agent.
///
/// Stateless apart from its configuration: each `respond` call works on a
/// deep copy of the caller's conversation, and consolidation returns new
/// notes for the caller to thread into the *next* agent instance.
pub struct CollaboratorAgent {
    pub(crate) gateway: Arc<dyn Generator>,
    pub(crate) config: AgentConfig,
    pub(crate) system_framing: String,
}

impl CollaboratorAgent {
    /// Create an agent. The system framing is fixed here, from the memory
    /// mode, for the lifetime of the instance.
    pub fn new(gateway: Arc<dyn Generator>, config: AgentConfig) -> Self {
        let max_tokens = config.params.max_tokens;
        let system_framing = match &config.memory {
            MemoryMode::None => prompts::base_system(max_tokens),
            MemoryMode::FixedPreferences(prefs) => {
                prompts::system_with_preferences(max_tokens, prefs)
            }
            // Before the first consolidation there is nothing to reflect on
            MemoryMode::EvolvingNotes { notes, .. } if notes.is_empty() => {
                prompts::base_system(max_tokens)
            }
            MemoryMode::EvolvingNotes { notes, .. } => {
                prompts::reflective_system(max_tokens, notes.as_str())
            }
        };

        Self {
            gateway,
            config,
            system_framing,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The notes this agent was constructed with, if in evolving mode.
    pub fn notes(&self) -> Option<&Notes> {
        match &self.config.memory {
            MemoryMode::EvolvingNotes { notes, .. } => Some(notes),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedGenerator;

    #[test]
    fn framing_follows_memory_mode() {
        let gateway = Arc::new(ScriptedGenerator::new(vec![]));

        let plain = CollaboratorAgent::new(
            gateway.clone(),
            AgentConfig::new("m", MemoryMode::None),
        );
        assert!(!plain.system_framing.contains("preferences. Follow them"));

        let fixed = CollaboratorAgent::new(
            gateway.clone(),
            AgentConfig::new("m", MemoryMode::FixedPreferences("1. Use Python.".into())),
        );
        assert!(fixed.system_framing.contains("1. Use Python."));

        let evolving = CollaboratorAgent::new(
            gateway,
            AgentConfig::new(
                "m",
                MemoryMode::EvolvingNotes {
                    notes: Notes::new("Prefers camelCase."),
                    scaffolding: ScaffoldingMode::Raw,
                },
            ),
        );
        assert!(evolving.system_framing.contains("Prefers camelCase."));
    }

    #[test]
    fn notes_accessor_only_in_evolving_mode() {
        let gateway = Arc::new(ScriptedGenerator::new(vec![]));
        let agent = CollaboratorAgent::new(
            gateway.clone(),
            AgentConfig::new("m", MemoryMode::FixedPreferences("prefs".into())),
        );
        assert!(agent.notes().is_none());

        let evolving = CollaboratorAgent::new(
            gateway,
            AgentConfig::new(
                "m",
                MemoryMode::EvolvingNotes {
                    notes: Notes::new("the notes"),
                    scaffolding: ScaffoldingMode::Raw,
                },
            ),
        );
        assert_eq!(evolving.notes().map(Notes::as_str), Some("the notes"));
    }
}
