//! Error handling for the Kiln CLI.
//!
//! Library failures arrive as [`ConfigError`] and are wrapped in [`CliError`]
//! together with the CLI's own failure modes. `main` renders every error
//! through [`cli_error_to_miette`].

mod report;

use std::path::PathBuf;

use kiln_config::{BuildMode, ConfigError};
use thiserror::Error;

pub use report::cli_error_to_miette;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Declarations failed to load or a plan failed to assemble
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Assembly failed for one specific mode
    #[error("{mode} plan is invalid: {source}")]
    InvalidPlan {
        mode: BuildMode,
        #[source]
        source: ConfigError,
    },

    /// Layered configuration could not be merged or extracted
    #[error("Failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// Explicit --config path does not exist
    #[error("Declaration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// One or more filenames passed to `kiln rules` have no rule
    #[error("No rule matches: {}", .0.join(", "))]
    UnmatchedFiles(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Figment(Box::new(err))
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;
