//! Layered declaration loading.
//!
//! Sources are merged with figment, later layers winning key by key:
//!
//! 1. built-in declarations (empty, or the demo set with `--defaults` or when
//!    no declaration file exists)
//! 2. the `--config` file, else the discovered `kiln.toml` or `package.json`
//! 3. `KILN_`-prefixed environment variables, `__` separating nested keys
//!    (`KILN_OUTPUT__BASE_PATH=build`)
//!
//! Arrays are replaced, not appended: a file that declares `rules` replaces
//! the built-in rule table wholesale.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Json, Serialized, Toml},
    Figment,
};
use kiln_config::discovery::{PACKAGE_FIELD, PACKAGE_JSON};
use kiln_config::{defaults, load_file, BuildDeclarations, ConfigDiscovery, ConfigError};
use tracing::debug;

use crate::cli::SourceArgs;
use crate::error::{CliError, Result};
use crate::ui;

pub const ENV_PREFIX: &str = "KILN_";

/// Environment variable consulted when `--mode` is absent.
pub const MODE_ENV: &str = "NODE_ENV";

/// The raw mode flag: `--mode` if given, else `NODE_ENV`.
pub fn raw_mode(arg: Option<&str>) -> Option<String> {
    arg.map(str::to_string)
        .or_else(|| std::env::var(MODE_ENV).ok())
}

/// Load declarations for `source`, resolving relative paths against `root`.
pub fn load_declarations(source: &SourceArgs, root: &Path) -> Result<BuildDeclarations> {
    let file = declaration_file(source, root)?;

    let base = if source.defaults || file.is_none() {
        if file.is_none() && !source.defaults {
            ui::warning("No kiln.toml or package.json \"kiln\" field found, using built-in defaults");
        }
        defaults::declarations()?
    } else {
        BuildDeclarations::default()
    };

    let mut figment = Figment::new().merge(Serialized::defaults(base));

    if let Some(path) = &file {
        debug!(path = %path.display(), "layering declaration file");
        figment = merge_file(figment, path)?;
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    // Extract untyped first so shorthand forms go through the library's own
    // deserialization and error reporting.
    let value: serde_json::Value = figment.extract()?;
    Ok(BuildDeclarations::from_value(value)?)
}

fn declaration_file(source: &SourceArgs, root: &Path) -> Result<Option<PathBuf>> {
    match &source.config {
        Some(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            };
            if !path.is_file() {
                return Err(CliError::FileNotFound(path));
            }
            Ok(Some(path))
        }
        None => Ok(ConfigDiscovery::new(root).find()),
    }
}

/// figment keeps only the last of repeated JSON keys, so JSON files are
/// parsed on their own first and a repeated entry name is reported before
/// layering.
fn reject_repeated_entries(path: &Path) -> Result<()> {
    let declarations = load_file(path)?;
    let mut seen = HashSet::new();
    for entry in &declarations.entries {
        if !seen.insert(entry.name()) {
            return Err(ConfigError::DuplicateEntryName(entry.name().to_string()).into());
        }
    }
    Ok(())
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    if is_json {
        reject_repeated_entries(path)?;
    }

    if path.file_name().is_some_and(|name| name == PACKAGE_JSON) {
        let content = std::fs::read_to_string(path)?;
        let package: serde_json::Value = serde_json::from_str(&content)?;
        let field = package
            .get(PACKAGE_FIELD)
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: PACKAGE_FIELD.to_string(),
                hint: Some("Add a 'kiln' field to your package.json".to_string()),
            })?;
        return Ok(figment.merge(Serialized::defaults(field)));
    }

    if is_json {
        Ok(figment.merge(Json::file(path)))
    } else {
        Ok(figment.merge(Toml::file(path)))
    }
}
