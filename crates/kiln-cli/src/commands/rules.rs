//! Rules command implementation.
//!
//! Prints one line per filename: the owning rule and its resolved chain in
//! declaration order.

use kiln_config::{BuildDeclarations, ChainResolver, EnvironmentPolicy, ResolvedChain};

use crate::cli::RulesArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::ui;

/// Execute the rules command. Fails after printing if any file is unmatched.
pub fn execute(args: RulesArgs) -> Result<()> {
    let root = std::env::current_dir()?;
    let declarations = config::load_declarations(&args.source, &root)?;
    let mode = config::raw_mode(args.mode.as_deref());
    let policy = EnvironmentPolicy::from_flag(mode.as_deref());

    declarations.rules.validate()?;

    let mut unmatched = Vec::new();
    for file in &args.files {
        match lookup(&declarations, &policy, file)? {
            Some((rule, chain)) => println!("{file}: {rule} [{}]", chain.tool_ids().join(", ")),
            None => {
                ui::error(&format!("{file}: no matching rule"));
                unmatched.push(file.clone());
            }
        }
    }

    if unmatched.is_empty() {
        Ok(())
    } else {
        Err(CliError::UnmatchedFiles(unmatched))
    }
}

/// First-match lookup for `file`, trying the resolve extensions when it has
/// none of its own.
pub fn lookup(
    declarations: &BuildDeclarations,
    policy: &EnvironmentPolicy,
    file: &str,
) -> Result<Option<(String, ResolvedChain)>> {
    let candidates = declarations.settings.resolve.candidates(file);
    let Some(rule) = candidates
        .iter()
        .find_map(|candidate| declarations.rules.match_file(candidate))
    else {
        return Ok(None);
    };

    let chain = ChainResolver::resolve(rule, policy)?;
    Ok(Some((rule.name().to_string(), chain)))
}
