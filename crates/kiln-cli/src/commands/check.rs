//! Check command implementation.
//!
//! Assembles the plan without printing it and reports the first error.

use kiln_config::{BuildDeclarations, BuildMode, BuildPlan, EnvironmentPolicy};

use crate::cli::CheckArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the check command.
///
/// With an explicit mode (`--mode` or `NODE_ENV`) only that mode is checked.
/// Otherwise development and production are checked in that order and the
/// first failing mode is reported.
pub fn execute(args: CheckArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let declarations = config::load_declarations(&args.source, &root)?;

    let modes = match config::raw_mode(args.mode.as_deref()) {
        Some(raw) => vec![EnvironmentPolicy::resolve(Some(&raw))],
        None => BuildMode::ALL.to_vec(),
    };

    for mode in modes {
        ui::info(&format!("Checking {mode} plan..."));
        let plan = check_mode(&declarations, mode)?;
        ui::success(&summary(&plan));
    }

    ui::success("All checks passed!");
    Ok(())
}

/// Assemble `declarations` for one already-resolved mode.
pub fn check_mode(declarations: &BuildDeclarations, mode: BuildMode) -> Result<BuildPlan> {
    declarations
        .assemble(Some(mode.as_str()))
        .map_err(|source| CliError::InvalidPlan { mode, source })
}

fn summary(plan: &BuildPlan) -> String {
    format!(
        "{} plan is valid: {} entries, {} rules, {} plugins",
        plan.mode(),
        plan.entries().len(),
        plan.resolved_chains().len(),
        plan.plugins().len()
    )
}
