//! Kiln CLI - assemble, check and inspect build plans.
//!
//! A thin command-line layer over `kiln-config`:
//!
//! - [`cli`] - argument definitions
//! - [`config`] - layered declaration loading (defaults, file, environment)
//! - [`commands`] - `plan`, `check` and `rules`
//! - [`error`] - CLI errors and their miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr
//!
//! Plans are printed to stdout; everything else goes to stderr.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
