//! Build mode resolution and the toggles derived from it.
//!
//! The raw mode flag is read exactly once, by [`EnvironmentPolicy::resolve`].
//! Everything downstream receives an [`EnvironmentPolicy`] value and never
//! looks at the process environment again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Port the development server listens on unless declarations say otherwise.
pub const DEFAULT_DEV_SERVER_PORT: u16 = 4200;

/// The development/production axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub const ALL: [BuildMode; 2] = [BuildMode::Development, BuildMode::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parsing. Use [`EnvironmentPolicy::resolve`] for the fail-open variant.
impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(BuildMode::Development),
            "production" | "prod" => Ok(BuildMode::Production),
            other => Err(format!("unknown build mode: {other}")),
        }
    }
}

/// Development server settings carried into the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DevServerPolicy {
    pub port: u16,
    pub hot: bool,
}

/// Behavioral toggles resolved from a single [`BuildMode`].
///
/// Every toggle is a pure function of the mode; the only other input is the
/// dev-server port, which is declared data rather than environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentPolicy {
    mode: BuildMode,
    minify: bool,
    emit_source_maps: bool,
    hash_filenames: bool,
    hot_reload: bool,
    dev_server: DevServerPolicy,
}

impl EnvironmentPolicy {
    /// Resolve a raw mode flag.
    ///
    /// Absent or unrecognized flags fall back to [`BuildMode::Development`].
    pub fn resolve(raw: Option<&str>) -> BuildMode {
        match raw {
            None => BuildMode::Development,
            Some(flag) => flag.parse().unwrap_or_else(|_| {
                warn!(flag, "unrecognized build mode, falling back to development");
                BuildMode::Development
            }),
        }
    }

    pub fn new(mode: BuildMode) -> Self {
        let development = mode == BuildMode::Development;
        Self {
            mode,
            minify: !development,
            emit_source_maps: development,
            hash_filenames: !development,
            hot_reload: development,
            dev_server: DevServerPolicy {
                port: DEFAULT_DEV_SERVER_PORT,
                hot: development,
            },
        }
    }

    /// Shorthand for `EnvironmentPolicy::new(EnvironmentPolicy::resolve(raw))`.
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self::new(Self::resolve(raw))
    }

    pub fn with_dev_server_port(mut self, port: u16) -> Self {
        self.dev_server.port = port;
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn minify(&self) -> bool {
        self.minify
    }

    pub fn emit_source_maps(&self) -> bool {
        self.emit_source_maps
    }

    pub fn hash_filenames(&self) -> bool {
        self.hash_filenames
    }

    pub fn hot_reload(&self) -> bool {
        self.hot_reload
    }

    pub fn dev_server(&self) -> &DevServerPolicy {
        &self.dev_server
    }

    /// Source map style handed to the executor, if any.
    pub fn source_map_style(&self) -> Option<&'static str> {
        self.emit_source_maps.then_some("source-map")
    }
}

impl Default for EnvironmentPolicy {
    fn default() -> Self {
        Self::new(BuildMode::default())
    }
}
