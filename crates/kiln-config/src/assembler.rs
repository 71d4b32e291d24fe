//! Top-level plan assembly.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chain::ChainResolver;
use crate::entry::EntryDeclaration;
use crate::error::{ConfigError, Result};
use crate::mode::EnvironmentPolicy;
use crate::output::{ChunkSplitting, OptimizationPolicy, OutputNamer, DEFAULT_BASE_PATH};
use crate::plan::BuildPlan;
use crate::plugin::{PluginAssembler, PluginSpec};
use crate::resolve::{ModuleReference, ResolveOptions};
use crate::rules::RuleTable;

fn default_context() -> PathBuf {
    PathBuf::from("src")
}

fn default_base_path() -> String {
    DEFAULT_BASE_PATH.to_string()
}

/// Where and how output is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default)]
    pub split_chunks: ChunkSplitting,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            split_chunks: ChunkSplitting::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevServerSettings {
    /// Listening port; the built-in default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Plan-wide settings that are not entries, rules or plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Directory entry sources are relative to.
    #[serde(default = "default_context")]
    pub context: PathBuf,

    #[serde(default)]
    pub resolve: ResolveOptions,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub dev_server: DevServerSettings,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            context: default_context(),
            resolve: ResolveOptions::default(),
            output: OutputSettings::default(),
            dev_server: DevServerSettings::default(),
        }
    }
}

/// Builds a [`BuildPlan`] from declarations and a raw mode flag.
///
/// Checks run in a fixed order and the first violation is returned:
/// entry names and sources, rule names, entry asset coverage, the plugin
/// registry. No partial plan is ever produced.
pub struct BuildConfigAssembler;

impl BuildConfigAssembler {
    /// Assemble with default [`PlanSettings`].
    ///
    /// ```
    /// use kiln_config::{
    ///     BuildConfigAssembler, EntryDeclaration, FileTypeRule, LoaderSpec, Matcher, PluginSpec,
    ///     RuleTable,
    /// };
    ///
    /// let entries = vec![EntryDeclaration::new("main", ["./index.ts"])];
    /// let rules = RuleTable::new(vec![FileTypeRule::new(Matcher::extension("ts").unwrap())
    ///     .named("ts")
    ///     .loader(LoaderSpec::new("ts-transform"))]);
    /// let plugins = vec![PluginSpec::new("clean")];
    ///
    /// let plan = BuildConfigAssembler::assemble(&entries, &rules, &plugins, Some("production"))
    ///     .unwrap();
    /// assert!(plan.output().include_content_hash());
    /// assert_eq!(plan.asset_rules()["./index.ts"], "ts");
    /// ```
    pub fn assemble(
        entries: &[EntryDeclaration],
        rules: &RuleTable,
        plugin_registry: &[PluginSpec],
        raw_mode: Option<&str>,
    ) -> Result<BuildPlan> {
        Self::assemble_with(
            entries,
            rules,
            plugin_registry,
            raw_mode,
            &PlanSettings::default(),
        )
    }

    pub fn assemble_with(
        entries: &[EntryDeclaration],
        rules: &RuleTable,
        plugin_registry: &[PluginSpec],
        raw_mode: Option<&str>,
        settings: &PlanSettings,
    ) -> Result<BuildPlan> {
        let mut policy = EnvironmentPolicy::from_flag(raw_mode);
        if let Some(port) = settings.dev_server.port {
            policy = policy.with_dev_server_port(port);
        }
        let mode = policy.mode();

        validate_entries(entries)?;
        rules.validate()?;
        let asset_rules = match_entry_assets(entries, rules, &settings.resolve)?;

        let plugins = PluginAssembler::assemble(&policy, plugin_registry)?;

        let mut resolved_chains = IndexMap::with_capacity(rules.len());
        for rule in rules.rules() {
            let chain = ChainResolver::resolve(rule, &policy)?;
            resolved_chains.insert(rule.name().to_string(), chain);
        }

        let output = OutputNamer::output_policy(
            plugins.iter().filter_map(PluginSpec::emitted_kind),
            &settings.output.base_path,
            &policy,
        );
        let optimization = OptimizationPolicy::for_policy(&policy, settings.output.split_chunks);

        info!(
            %mode,
            entries = entries.len(),
            rules = resolved_chains.len(),
            plugins = plugins.len(),
            "assembled build plan"
        );

        Ok(BuildPlan {
            policy,
            context: settings.context.clone(),
            entries: entries.to_vec(),
            asset_rules,
            rules: rules.clone(),
            resolved_chains,
            plugins,
            output,
            optimization,
            resolve: settings.resolve.clone(),
        })
    }
}

fn validate_entries(entries: &[EntryDeclaration]) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        crate::entry::validate_entry_name(entry.name())?;
        if !seen.insert(entry.name()) {
            return Err(ConfigError::DuplicateEntryName(entry.name().to_string()));
        }
        entry.validate()?;
    }
    Ok(())
}

/// Every local entry source must be covered by a rule.
fn match_entry_assets(
    entries: &[EntryDeclaration],
    rules: &RuleTable,
    resolve: &ResolveOptions,
) -> Result<IndexMap<String, String>> {
    let mut asset_rules = IndexMap::new();

    for entry in entries {
        for source in entry.sources() {
            let asset = match resolve.classify(source) {
                ModuleReference::Package(package) => {
                    debug!(entry = entry.name(), package, "package reference, not rule-matched");
                    continue;
                }
                ModuleReference::Local(asset) => asset,
            };

            let rule = resolve
                .candidates(asset)
                .iter()
                .find_map(|candidate| rules.match_file(candidate))
                .ok_or_else(|| ConfigError::NoMatchingRule {
                    entry: entry.name().to_string(),
                    asset: asset.to_string(),
                })?;

            debug!(entry = entry.name(), asset, rule = rule.name(), "matched entry asset");
            asset_rules.insert(asset.to_string(), rule.name().to_string());
        }
    }

    Ok(asset_rules)
}
