//! Loader steps: one transform tool in a file-type chain.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::mode::BuildMode;
use crate::overrides::{options_for_mode, ModeOverrides, Options};

/// A single step of a loader chain.
///
/// Declarations may name a loader by tool id alone (`"css-loader"`) or as a
/// full object:
///
/// ```
/// use kiln_config::{BuildMode, LoaderSpec};
/// use serde_json::json;
///
/// let short: LoaderSpec = serde_json::from_value(json!("css-loader")).unwrap();
/// assert_eq!(short.tool_id(), "css-loader");
///
/// let full: LoaderSpec = serde_json::from_value(json!({
///     "loader": "eslint-loader",
///     "only_in": "development"
/// }))
/// .unwrap();
/// assert!(!full.is_active_in(BuildMode::Production));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LoaderDeclaration")]
pub struct LoaderSpec {
    #[serde(rename = "loader")]
    tool_id: String,

    #[serde(skip_serializing_if = "Options::is_empty")]
    options: Options,

    /// Restricts the step to one build mode; `None` keeps it in every mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    only_in: Option<BuildMode>,

    #[serde(skip_serializing_if = "ModeOverrides::is_empty")]
    overrides: ModeOverrides,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoaderDeclaration {
    ToolId(String),
    Full {
        loader: String,
        #[serde(default)]
        options: Options,
        #[serde(default)]
        only_in: Option<BuildMode>,
        #[serde(default)]
        overrides: ModeOverrides,
    },
}

impl From<LoaderDeclaration> for LoaderSpec {
    fn from(declaration: LoaderDeclaration) -> Self {
        match declaration {
            LoaderDeclaration::ToolId(tool_id) => LoaderSpec::new(tool_id),
            LoaderDeclaration::Full {
                loader,
                options,
                only_in,
                overrides,
            } => LoaderSpec {
                tool_id: loader,
                options,
                only_in,
                overrides,
            },
        }
    }
}

impl LoaderSpec {
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            options: Options::new(),
            only_in: None,
            overrides: ModeOverrides::new(),
        }
    }

    /// Replace the base options. Non-object values are ignored.
    pub fn with_options(mut self, options: Value) -> Self {
        if let Value::Object(map) = options {
            self.options = map;
        }
        self
    }

    pub fn only_in(mut self, mode: BuildMode) -> Self {
        self.only_in = Some(mode);
        self
    }

    pub fn with_override(mut self, mode: BuildMode, options: Value) -> Self {
        self.overrides.insert(mode, options);
        self
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn restricted_to(&self) -> Option<BuildMode> {
        self.only_in
    }

    pub fn overrides(&self) -> &ModeOverrides {
        &self.overrides
    }

    pub fn is_active_in(&self, mode: BuildMode) -> bool {
        self.only_in.is_none_or(|only| only == mode)
    }

    /// Concrete step for `mode`: overrides applied, override table dropped.
    pub(crate) fn resolve_for(&self, mode: BuildMode) -> Result<LoaderSpec> {
        let options = options_for_mode(&self.tool_id, &self.options, &self.overrides, mode)?;
        Ok(LoaderSpec {
            tool_id: self.tool_id.clone(),
            options,
            only_in: self.only_in,
            overrides: ModeOverrides::new(),
        })
    }
}
