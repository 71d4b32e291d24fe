//! The assembled, immutable build plan.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::chain::ResolvedChain;
use crate::entry::EntryDeclaration;
use crate::mode::{BuildMode, EnvironmentPolicy};
use crate::output::{OptimizationPolicy, OutputPolicy};
use crate::plugin::PluginSpec;
use crate::resolve::ResolveOptions;
use crate::rules::{FileTypeRule, RuleTable};

/// Fully resolved build description handed to the executor.
///
/// Only [`BuildConfigAssembler`](crate::BuildConfigAssembler) constructs
/// plans, and a returned plan has passed every structural check. There are
/// no mutating methods; share it behind an `Arc` when several consumers need
/// it at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildPlan {
    /// Serialized inline, so the mode appears once as the top-level `mode`.
    #[serde(flatten)]
    pub(crate) policy: EnvironmentPolicy,
    pub(crate) context: PathBuf,
    pub(crate) entries: Vec<EntryDeclaration>,
    /// Local entry asset → name of the rule that covers it.
    pub(crate) asset_rules: IndexMap<String, String>,
    pub(crate) rules: RuleTable,
    /// Rule name → loader chain for this plan's mode, in rule order.
    pub(crate) resolved_chains: IndexMap<String, ResolvedChain>,
    pub(crate) plugins: Vec<PluginSpec>,
    pub(crate) output: OutputPolicy,
    pub(crate) optimization: OptimizationPolicy,
    pub(crate) resolve: ResolveOptions,
}

impl BuildPlan {
    pub fn mode(&self) -> BuildMode {
        self.policy.mode()
    }

    pub fn policy(&self) -> &EnvironmentPolicy {
        &self.policy
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn entries(&self) -> &[EntryDeclaration] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&EntryDeclaration> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn asset_rules(&self) -> &IndexMap<String, String> {
        &self.asset_rules
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn resolved_chains(&self) -> &IndexMap<String, ResolvedChain> {
        &self.resolved_chains
    }

    /// Chain for the rule that owns `filename`, by first-match-wins lookup.
    pub fn chain_for(&self, filename: &str) -> Option<(&FileTypeRule, &ResolvedChain)> {
        let rule = self.rules.match_file(filename)?;
        let chain = self.resolved_chains.get(rule.name())?;
        Some((rule, chain))
    }

    /// Active plugins in execution order.
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    pub fn output(&self) -> &OutputPolicy {
        &self.output
    }

    pub fn optimization(&self) -> &OptimizationPolicy {
        &self.optimization
    }

    pub fn resolve(&self) -> &ResolveOptions {
        &self.resolve
    }
}
