//! Error types for declaration loading and plan assembly.

use thiserror::Error;

use crate::mode::BuildMode;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Assembly errors (fatal, the plan is never returned)
    #[error("no rule matches asset '{asset}' (referenced by entry '{entry}')")]
    NoMatchingRule { entry: String, asset: String },

    #[error("entry name '{0}' is declared more than once")]
    DuplicateEntryName(String),

    #[error("plugin '{id}' is active more than once in {mode} mode")]
    DuplicatePlugin { id: String, mode: BuildMode },

    #[error("plugin '{0}' is not active in any build mode")]
    DeadPluginConfiguration(String),

    #[error("invalid entry name '{0}': must start with a letter and contain only letters, digits, '_' or '-'")]
    InvalidEntryName(String),

    #[error("entry '{0}' has no sources")]
    EmptyEntry(String),

    #[error("rule name '{0}' is declared more than once")]
    DuplicateRule(String),

    #[error("invalid matcher pattern '{pattern}': {message}")]
    InvalidMatcher { pattern: String, message: String },

    // Declaration loading errors
    #[error("no build declarations found")]
    NotFound,

    #[error("invalid value for '{field}'{}", hint.as_ref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    #[error("invalid {mode} override for '{target}': {message}")]
    InvalidOverride {
        target: String,
        mode: BuildMode,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Whether the error came out of plan assembly rather than loading.
    pub fn is_assembly_error(&self) -> bool {
        matches!(
            self,
            ConfigError::NoMatchingRule { .. }
                | ConfigError::DuplicateEntryName(_)
                | ConfigError::DuplicatePlugin { .. }
                | ConfigError::DeadPluginConfiguration(_)
                | ConfigError::InvalidEntryName(_)
                | ConfigError::EmptyEntry(_)
                | ConfigError::DuplicateRule(_)
                | ConfigError::InvalidMatcher { .. }
                | ConfigError::InvalidOverride { .. }
        )
    }
}
