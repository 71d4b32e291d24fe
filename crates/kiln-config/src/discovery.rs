//! File-based declaration discovery for CLI use
//!
//! Handles finding and loading build declarations from the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::declarations::BuildDeclarations;
use crate::error::{ConfigError, Result};

pub const TOML_FILE: &str = "kiln.toml";
pub const PACKAGE_JSON: &str = "package.json";
pub const PACKAGE_FIELD: &str = "kiln";

/// File-based declaration discovery
///
/// Library users should prefer `BuildDeclarations::from_value()`.
///
/// # Example
///
/// ```no_run
/// use kiln_config::ConfigDiscovery;
///
/// let discovery = ConfigDiscovery::new(".");
/// let declarations = discovery.load().unwrap();
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a declaration file in the root directory
    ///
    /// Searches in this order:
    /// 1. kiln.toml
    /// 2. package.json (kiln field)
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join(TOML_FILE);
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join(PACKAGE_JSON);
        let has_field = fs::read_to_string(&pkg_path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .is_some_and(|parsed| parsed.get(PACKAGE_FIELD).is_some_and(|v| !v.is_null()));

        has_field.then_some(pkg_path)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no declaration file is found.
    pub fn load(&self) -> Result<BuildDeclarations> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        load_file(&path)
    }
}

/// Load declarations from a specific `kiln.toml`, JSON or `package.json` file.
pub fn load_file(path: &Path) -> Result<BuildDeclarations> {
    debug!(path = %path.display(), "loading build declarations");
    let content = fs::read_to_string(path)?;

    if path.file_name() == Some(std::ffi::OsStr::new(PACKAGE_JSON)) {
        return from_package_json(&content);
    }

    if path.extension() == Some(std::ffi::OsStr::new("json")) {
        return BuildDeclarations::from_json_str(&content);
    }

    let toml_val: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("Invalid TOML syntax: {}", e)),
    })?;

    let value = serde_json::to_value(toml_val).map_err(|e| ConfigError::InvalidValue {
        field: "toml".to_string(),
        hint: Some(format!("TOML to JSON conversion failed: {}", e)),
    })?;

    BuildDeclarations::from_value(value)
}

/// The part of `package.json` kiln reads. Parsed straight from text so the
/// declarations keep any repeated entry names.
#[derive(Deserialize)]
struct PackageManifest {
    #[serde(default, rename = "kiln")]
    declarations: Option<BuildDeclarations>,
}

fn from_package_json(content: &str) -> Result<BuildDeclarations> {
    let manifest: PackageManifest =
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidValue {
            field: PACKAGE_JSON.to_string(),
            hint: Some(format!("Invalid JSON: {}", e)),
        })?;

    manifest.declarations.ok_or_else(|| ConfigError::InvalidValue {
        field: PACKAGE_FIELD.to_string(),
        hint: Some("Add a 'kiln' field to your package.json".to_string()),
    })
}

/// Discover and load declarations from the current directory
pub fn discover() -> Result<BuildDeclarations> {
    let root = std::env::current_dir()?;
    ConfigDiscovery::new(&root).load()
}
