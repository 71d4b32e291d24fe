use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available Kiln subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a build plan and print it as JSON
    ///
    /// The plan lists entries, resolved loader chains, active plugins,
    /// output naming and optimization settings for the selected mode.
    Plan(PlanArgs),

    /// Validate build declarations
    ///
    /// Assembles the plan for the given mode, or for both development and
    /// production when no mode is given, and reports the first error.
    Check(CheckArgs),

    /// Show which rule each filename matches
    ///
    /// Examples:
    ///   kiln rules src/index.ts styles/site.scss
    Rules(RulesArgs),
}

/// Where declarations come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Declaration file (kiln.toml, *.json or package.json)
    ///
    /// Defaults to kiln.toml, then the "kiln" field of package.json, in
    /// the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start from the built-in demo declarations
    ///
    /// Values from the declaration file and KILN_* environment variables
    /// are layered on top.
    #[arg(long)]
    pub defaults: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Build mode (development or production)
    ///
    /// Falls back to NODE_ENV. Unrecognized values select development.
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Pretty-print the JSON plan
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Build mode to check; both modes are checked when omitted
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Filenames to look up
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Build mode used to resolve the matched chains
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}
