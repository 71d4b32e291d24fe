//! Command-line interface definition.
//!
//! - `kiln plan` - assemble a plan and print it as JSON
//! - `kiln check` - validate declarations in one or both modes
//! - `kiln rules` - show which rule owns each filename

mod commands;

use clap::Parser;

pub use commands::{CheckArgs, Command, PlanArgs, RulesArgs, SourceArgs};

/// Kiln - declarative build configuration
#[derive(Parser, Debug)]
#[command(
    name = "kiln",
    version,
    about = "Assemble and validate declarative build plans",
    long_about = "Kiln turns entry declarations, file-type rules and a plugin registry into\n\
                  one validated build plan for development or production."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows every rule match, skipped loader step and plugin decision.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
