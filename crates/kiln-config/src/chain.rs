//! Resolution of rule templates into concrete loader chains.
//!
//! Chains keep declaration order. The executor applies them last declared,
//! first applied: for `[extract, css-loader, sass-loader]` the source goes
//! through `sass-loader` first and `extract` last. Reordering a chain changes
//! the build output, so nothing here ever sorts or dedupes steps.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::loader::LoaderSpec;
use crate::mode::EnvironmentPolicy;
use crate::rules::FileTypeRule;

/// Loader steps for one rule under one build mode, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedChain {
    loaders: Vec<LoaderSpec>,
}

impl ResolvedChain {
    /// Steps in declaration order.
    pub fn loaders(&self) -> &[LoaderSpec] {
        &self.loaders
    }

    /// Steps in the order they run over a source file.
    pub fn application_order(&self) -> impl Iterator<Item = &LoaderSpec> {
        self.loaders.iter().rev()
    }

    pub fn tool_ids(&self) -> Vec<&str> {
        self.loaders.iter().map(LoaderSpec::tool_id).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

/// Turns a [`FileTypeRule`] template into a [`ResolvedChain`].
///
/// Pure: the same rule and policy always produce the same chain.
pub struct ChainResolver;

impl ChainResolver {
    /// Resolve with the rule's own extension stage, if it declares one.
    pub fn resolve(rule: &FileTypeRule, policy: &EnvironmentPolicy) -> Result<ResolvedChain> {
        Self::resolve_with_extension(rule, policy, None)
    }

    /// Resolve with a caller-supplied extension stage.
    ///
    /// `extension` replaces the rule's declared stage. Rules without an
    /// extension point ignore it.
    pub fn resolve_with_extension(
        rule: &FileTypeRule,
        policy: &EnvironmentPolicy,
        extension: Option<&LoaderSpec>,
    ) -> Result<ResolvedChain> {
        let mode = policy.mode();
        let mut loaders = Vec::with_capacity(rule.chain_template().len() + 1);

        for step in rule.chain_template() {
            if !step.is_active_in(mode) {
                debug!(rule = rule.name(), loader = step.tool_id(), %mode, "skipping loader step");
                continue;
            }
            loaders.push(step.resolve_for(mode)?);
        }

        let tail = if rule.has_extension_point() {
            extension.or(rule.extension_stage())
        } else {
            if let Some(ignored) = extension {
                warn!(
                    rule = rule.name(),
                    loader = ignored.tool_id(),
                    "rule has no extension point, ignoring extension stage"
                );
            }
            None
        };

        if let Some(step) = tail.filter(|step| step.is_active_in(mode)) {
            loaders.push(step.resolve_for(mode)?);
        }

        debug!(rule = rule.name(), %mode, steps = loaders.len(), "resolved loader chain");
        Ok(ResolvedChain { loaders })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::BuildMode;
    use crate::rules::Matcher;
    use serde_json::json;

    fn css_rule() -> FileTypeRule {
        FileTypeRule::new(Matcher::extension("css").unwrap())
            .named("css")
            .loader(
                LoaderSpec::new("css-extract")
                    .with_options(json!({ "hmr": false, "reloadAll": true }))
                    .with_override(BuildMode::Development, json!({ "hmr": true })),
            )
            .loader(LoaderSpec::new("css-loader"))
    }

    fn js_rule() -> FileTypeRule {
        FileTypeRule::new(Matcher::extension("js").unwrap())
            .named("js")
            .loader(LoaderSpec::new("babel-loader"))
            .loader(LoaderSpec::new("eslint-loader").only_in(BuildMode::Development))
    }

    #[test]
    fn development_only_step_is_kept_in_development() {
        let chain =
            ChainResolver::resolve(&js_rule(), &EnvironmentPolicy::new(BuildMode::Development))
                .unwrap();
        assert_eq!(chain.tool_ids(), vec!["babel-loader", "eslint-loader"]);
    }

    #[test]
    fn development_only_step_is_dropped_in_production() {
        let chain =
            ChainResolver::resolve(&js_rule(), &EnvironmentPolicy::new(BuildMode::Production))
                .unwrap();
        assert_eq!(chain.tool_ids(), vec!["babel-loader"]);
    }

    #[test]
    fn extension_is_appended_at_the_tail() {
        let rule = css_rule().extension(LoaderSpec::new("sass-loader"));
        let chain =
            ChainResolver::resolve(&rule, &EnvironmentPolicy::new(BuildMode::Production)).unwrap();
        assert_eq!(
            chain.tool_ids(),
            vec!["css-extract", "css-loader", "sass-loader"]
        );
        let applied: Vec<_> = chain.application_order().map(LoaderSpec::tool_id).collect();
        assert_eq!(applied, vec!["sass-loader", "css-loader", "css-extract"]);
    }

    #[test]
    fn caller_extension_replaces_declared_stage() {
        let rule = css_rule().extension(LoaderSpec::new("sass-loader"));
        let less = LoaderSpec::new("less-loader");
        let chain = ChainResolver::resolve_with_extension(
            &rule,
            &EnvironmentPolicy::new(BuildMode::Development),
            Some(&less),
        )
        .unwrap();
        assert_eq!(
            chain.tool_ids(),
            vec!["css-extract", "css-loader", "less-loader"]
        );
    }

    #[test]
    fn empty_extension_point_accepts_caller_stage() {
        let rule = css_rule().extensible();
        let policy = EnvironmentPolicy::new(BuildMode::Development);

        let plain = ChainResolver::resolve(&rule, &policy).unwrap();
        assert_eq!(plain.tool_ids(), vec!["css-extract", "css-loader"]);

        let less = LoaderSpec::new("less-loader");
        let extended = ChainResolver::resolve_with_extension(&rule, &policy, Some(&less)).unwrap();
        assert_eq!(extended.len(), 3);
    }

    #[test]
    fn extension_ignored_without_extension_point() {
        let less = LoaderSpec::new("less-loader");
        let chain = ChainResolver::resolve_with_extension(
            &js_rule(),
            &EnvironmentPolicy::new(BuildMode::Production),
            Some(&less),
        )
        .unwrap();
        assert_eq!(chain.tool_ids(), vec!["babel-loader"]);
    }

    #[test]
    fn mode_overrides_are_applied() {
        let dev = ChainResolver::resolve(&css_rule(), &EnvironmentPolicy::new(BuildMode::Development))
            .unwrap();
        assert_eq!(dev.loaders()[0].options()["hmr"], json!(true));

        let prod = ChainResolver::resolve(&css_rule(), &EnvironmentPolicy::new(BuildMode::Production))
            .unwrap();
        assert_eq!(prod.loaders()[0].options()["hmr"], json!(false));
    }

    #[test]
    fn resolution_is_idempotent() {
        let rule = css_rule().extension(LoaderSpec::new("sass-loader"));
        let policy = EnvironmentPolicy::new(BuildMode::Development);
        let first = ChainResolver::resolve(&rule, &policy).unwrap();
        let second = ChainResolver::resolve(&rule, &policy).unwrap();
        assert_eq!(first, second);
    }
}
