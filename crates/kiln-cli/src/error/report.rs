//! Miette rendering for CLI errors.

use kiln_config::ConfigError;
use miette::Report;

use crate::error::CliError;

/// Convert a CliError to a miette Report with an actionable hint.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(&e, None),
        CliError::InvalidPlan { mode, source } => {
            config_error_to_miette(&source, Some(mode.as_str()))
        }
        CliError::FileNotFound(path) => miette::miette!(
            help = "Pass an existing file to --config, or omit it to discover kiln.toml",
            "Declaration file not found: {}",
            path.display()
        ),
        CliError::UnmatchedFiles(files) => miette::miette!(
            help = "Add a rule whose `test` pattern matches these files",
            "No rule matches: {}",
            files.join(", ")
        ),
        other => miette::miette!("{}", other),
    }
}

fn config_error_to_miette(err: &ConfigError, mode: Option<&str>) -> Report {
    let message = match mode {
        Some(mode) => format!("{mode} plan is invalid: {err}"),
        None => err.to_string(),
    };

    match hint_for(err) {
        Some(hint) => miette::miette!(help = hint, "{}", message),
        None => miette::miette!("{}", message),
    }
}

fn hint_for(err: &ConfigError) -> Option<&'static str> {
    if !err.is_assembly_error() {
        return match err {
            ConfigError::NotFound => {
                Some("Create kiln.toml, add a \"kiln\" field to package.json, or pass --defaults")
            }
            ConfigError::InvalidValue { .. } => {
                Some("Top-level keys are entries, rules, plugins, context, resolve, output and dev_server")
            }
            _ => None,
        };
    }

    let hint = match err {
        ConfigError::NoMatchingRule { .. } => {
            "Add a rule for this file type, or check `resolve.extensions` for extensionless sources"
        }
        ConfigError::DuplicateEntryName(_) => "Entry names must be unique; rename one of them",
        ConfigError::DuplicatePlugin { .. } => {
            "Restrict one of the registrations with `active_in` so they never overlap"
        }
        ConfigError::DeadPluginConfiguration(_) => {
            "Remove the plugin or list at least one mode in `active_in`"
        }
        ConfigError::InvalidEntryName(_) => "Example of a valid name: main, admin_panel, chunk-2",
        ConfigError::EmptyEntry(_) => "List at least one source, e.g. main = \"./index.js\"",
        ConfigError::DuplicateRule(_) => "Give each rule a distinct `name`",
        ConfigError::InvalidMatcher { .. } => "Rule `test` and `exclude` values are regular expressions",
        ConfigError::InvalidOverride { .. } => "Mode overrides must be option tables",
        _ => return None,
    };
    Some(hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::BuildMode;

    #[test]
    fn assembly_errors_carry_a_hint() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::DeadPluginConfiguration(
            "clean".into(),
        )));
        let help = report.help().map(|h| h.to_string());
        assert!(help.is_some_and(|h| h.contains("active_in")));
    }

    #[test]
    fn mode_prefixes_message() {
        let report = cli_error_to_miette(CliError::InvalidPlan {
            mode: BuildMode::Development,
            source: ConfigError::EmptyEntry("main".into()),
        });
        assert!(report.to_string().starts_with("development plan is invalid"));
    }

    #[test]
    fn loading_errors_get_a_loading_hint() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::InvalidValue {
            field: "declarations".into(),
            hint: None,
        }));
        let help = report.help().map(|h| h.to_string());
        assert!(help.is_some_and(|h| h.contains("dev_server")));

        let report = cli_error_to_miette(CliError::Config(ConfigError::Io(std::io::Error::other(
            "denied",
        ))));
        assert!(report.help().is_none());
    }

    #[test]
    fn io_errors_have_no_hint() {
        let report = cli_error_to_miette(CliError::Io(std::io::Error::other("disk on fire")));
        assert!(report.help().is_none());
        assert!(report.to_string().contains("disk on fire"));
    }
}
