//! The declaration document: everything a plan is assembled from except
//! the mode flag.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::assembler::{BuildConfigAssembler, PlanSettings};
use crate::entry::{EntryDeclaration, EntryTable};
use crate::error::{ConfigError, Result};
use crate::plan::BuildPlan;
use crate::plugin::PluginSpec;
use crate::rules::RuleTable;

/// Raw build declarations as loaded from `kiln.toml`, `package.json` or an
/// API payload.
///
/// ```toml
/// [entries]
/// main = ["@babel/polyfill", "./index.jsx"]
/// analytics = "./analytics.ts"
///
/// [[rules]]
/// name = "ts"
/// test = '\.ts$'
/// exclude = ["node_modules"]
/// chain = ["babel-loader"]
///
/// [[plugins]]
/// id = "bundle-analyzer"
/// active_in = ["production"]
///
/// [output]
/// base_path = "dist"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildDeclarations {
    #[serde(default, deserialize_with = "entry_table")]
    pub entries: Vec<EntryDeclaration>,

    #[serde(default)]
    pub rules: RuleTable,

    #[serde(default)]
    pub plugins: Vec<PluginSpec>,

    #[serde(flatten)]
    pub settings: PlanSettings,
}

fn entry_table<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<EntryDeclaration>, D::Error> {
    EntryTable::deserialize(deserializer).map(Into::into)
}

impl BuildDeclarations {
    /// Create from serde_json::Value (for programmatic declarations)
    ///
    /// # Example
    ///
    /// ```
    /// use kiln_config::BuildDeclarations;
    /// use serde_json::json;
    ///
    /// let declarations = BuildDeclarations::from_value(json!({
    ///     "entries": { "main": "./index.ts" },
    ///     "rules": [{ "test": "\\.ts$", "chain": ["ts-loader"] }]
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(declarations.entries[0].name(), "main");
    /// assert_eq!(declarations.rules.len(), 1);
    /// ```
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "declarations".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Parse a JSON document directly from text.
    ///
    /// Unlike [`from_value`](Self::from_value), repeated keys in the
    /// `entries` table survive parsing, so assembly can reject them as
    /// [`ConfigError::DuplicateEntryName`].
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::InvalidValue {
            field: "json".to_string(),
            hint: Some(format!("Invalid JSON: {}", e)),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "declarations".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Assemble a plan for `raw_mode` (see [`BuildConfigAssembler`]).
    pub fn assemble(&self, raw_mode: Option<&str>) -> Result<BuildPlan> {
        BuildConfigAssembler::assemble_with(
            &self.entries,
            &self.rules,
            &self.plugins,
            raw_mode,
            &self.settings,
        )
    }
}
