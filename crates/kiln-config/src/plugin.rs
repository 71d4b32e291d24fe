//! Lifecycle plugins and their per-mode selection.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::mode::{BuildMode, EnvironmentPolicy};
use crate::output::OutputNamer;
use crate::overrides::{options_for_mode, ModeOverrides, Options};

fn all_modes() -> BTreeSet<BuildMode> {
    BuildMode::ALL.into_iter().collect()
}

/// A lifecycle plugin declaration (cleanup, templating, copying, extraction,
/// analysis, ...).
///
/// `active_in` defaults to every mode when omitted from a declaration. An
/// explicit empty list is a configuration bug and fails assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginSpec {
    #[serde(rename = "id")]
    plugin_id: String,

    #[serde(default = "all_modes")]
    active_in: BTreeSet<BuildMode>,

    #[serde(default, skip_serializing_if = "Options::is_empty")]
    options: Options,

    #[serde(default, skip_serializing_if = "ModeOverrides::is_empty")]
    overrides: ModeOverrides,

    /// Asset kind this plugin writes; its `filename` option is filled from
    /// the output policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emits: Option<String>,
}

impl PluginSpec {
    /// A plugin active in every build mode.
    pub fn new(plugin_id: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            active_in: all_modes(),
            options: Options::new(),
            overrides: ModeOverrides::new(),
            emits: None,
        }
    }

    pub fn active_in(mut self, modes: impl IntoIterator<Item = BuildMode>) -> Self {
        self.active_in = modes.into_iter().collect();
        self
    }

    pub fn only_in(self, mode: BuildMode) -> Self {
        self.active_in([mode])
    }

    /// Replace the base options. Non-object values are ignored.
    pub fn with_options(mut self, options: Value) -> Self {
        if let Value::Object(map) = options {
            self.options = map;
        }
        self
    }

    pub fn with_override(mut self, mode: BuildMode, options: Value) -> Self {
        self.overrides.insert(mode, options);
        self
    }

    pub fn emits(mut self, asset_kind: impl Into<String>) -> Self {
        self.emits = Some(asset_kind.into());
        self
    }

    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    pub fn modes(&self) -> &BTreeSet<BuildMode> {
        &self.active_in
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn emitted_kind(&self) -> Option<&str> {
        self.emits.as_deref()
    }

    pub fn is_active_in(&self, mode: BuildMode) -> bool {
        self.active_in.contains(&mode)
    }
}

/// Filters a plugin registry down to the plugins that run in one mode.
pub struct PluginAssembler;

impl PluginAssembler {
    /// Active plugins in registry order, options resolved for the mode.
    ///
    /// Registry order is execution order and is never changed. Fails on a
    /// plugin active in no mode, or on two active plugins sharing an id.
    pub fn assemble(policy: &EnvironmentPolicy, registry: &[PluginSpec]) -> Result<Vec<PluginSpec>> {
        if let Some(dead) = registry.iter().find(|spec| spec.active_in.is_empty()) {
            return Err(ConfigError::DeadPluginConfiguration(dead.plugin_id.clone()));
        }

        let mode = policy.mode();
        let mut seen = HashSet::new();
        let mut active = Vec::new();

        for spec in registry {
            if !spec.is_active_in(mode) {
                debug!(plugin = spec.plugin_id(), %mode, "plugin inactive in this mode");
                continue;
            }
            if !seen.insert(spec.plugin_id.as_str()) {
                return Err(ConfigError::DuplicatePlugin {
                    id: spec.plugin_id.clone(),
                    mode,
                });
            }
            active.push(Self::resolve(spec, policy)?);
        }

        debug!(%mode, count = active.len(), "assembled plugins");
        Ok(active)
    }

    fn resolve(spec: &PluginSpec, policy: &EnvironmentPolicy) -> Result<PluginSpec> {
        let mut options =
            options_for_mode(&spec.plugin_id, &spec.options, &spec.overrides, policy.mode())?;

        if let Some(kind) = &spec.emits {
            options.insert(
                "filename".to_string(),
                Value::String(OutputNamer::name_for(kind, policy)),
            );
        }

        Ok(PluginSpec {
            plugin_id: spec.plugin_id.clone(),
            active_in: spec.active_in.clone(),
            options,
            overrides: ModeOverrides::new(),
            emits: spec.emits.clone(),
        })
    }
}
