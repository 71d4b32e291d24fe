//! Built-in declarations for a browser application: two entry bundles,
//! script/style/asset rules and the usual lifecycle plugins.
//!
//! Used by the CLI when no declaration file is found, and as a fixture for
//! tests.

use std::path::PathBuf;

use serde_json::json;

use crate::assembler::PlanSettings;
use crate::declarations::BuildDeclarations;
use crate::entry::EntryDeclaration;
use crate::error::Result;
use crate::loader::LoaderSpec;
use crate::mode::BuildMode;
use crate::plugin::PluginSpec;
use crate::rules::{FileTypeRule, Matcher, RuleTable};

const NODE_MODULES: &str = "node_modules";

pub fn declarations() -> Result<BuildDeclarations> {
    let mut settings = PlanSettings::default();
    settings
        .resolve
        .aliases
        .insert("models".to_string(), PathBuf::from("src/models"));
    settings
        .resolve
        .aliases
        .insert("@".to_string(), PathBuf::from("src"));

    Ok(BuildDeclarations {
        entries: entries(),
        rules: rule_table()?,
        plugins: plugin_registry(),
        settings,
    })
}

pub fn entries() -> Vec<EntryDeclaration> {
    vec![
        EntryDeclaration::new("main", ["@babel/polyfill", "./index.jsx"]),
        EntryDeclaration::new("analytics", ["./analytics.ts"]),
    ]
}

fn babel(preset: Option<&str>) -> LoaderSpec {
    let mut presets = vec!["@babel/preset-env"];
    presets.extend(preset);
    LoaderSpec::new("babel-loader").with_options(json!({
        "presets": presets,
        "plugins": ["@babel/plugin-proposal-class-properties"]
    }))
}

fn css_extract() -> LoaderSpec {
    LoaderSpec::new("mini-css-extract-loader")
        .with_options(json!({ "hmr": false, "reloadAll": true }))
        .with_override(BuildMode::Development, json!({ "hmr": true }))
}

fn css_rule(name: &str, test: Matcher) -> FileTypeRule {
    FileTypeRule::new(test)
        .named(name)
        .loader(css_extract())
        .loader(LoaderSpec::new("css-loader"))
}

/// Patterns below are constants; a failure here is a bug in this module.
pub fn rule_table() -> Result<RuleTable> {
    let node_modules = Matcher::new(NODE_MODULES)?;

    Ok(RuleTable::new(vec![
        FileTypeRule::new(Matcher::extension("js")?)
            .named("js")
            .exclude(node_modules.clone())
            .loader(babel(None))
            .loader(LoaderSpec::new("eslint-loader").only_in(BuildMode::Development)),
        FileTypeRule::new(Matcher::extension("ts")?)
            .named("ts")
            .exclude(node_modules.clone())
            .loader(babel(Some("@babel/preset-typescript"))),
        FileTypeRule::new(Matcher::extension("jsx")?)
            .named("jsx")
            .exclude(node_modules)
            .loader(babel(Some("@babel/preset-react"))),
        css_rule("css", Matcher::extension("css")?).extensible(),
        FileTypeRule::new(Matcher::extensions(&["png", "jpg", "svg", "gif"])?)
            .named("images")
            .loader(LoaderSpec::new("file-loader")),
        FileTypeRule::new(Matcher::extensions(&["ttf", "woff", "woff2", "eot"])?)
            .named("fonts")
            .loader(LoaderSpec::new("file-loader")),
        FileTypeRule::new(Matcher::extension("xml")?)
            .named("xml")
            .loader(LoaderSpec::new("xml-loader")),
        FileTypeRule::new(Matcher::extension("csv")?)
            .named("csv")
            .loader(LoaderSpec::new("csv-loader")),
        css_rule("less", Matcher::extension("less")?).extension(LoaderSpec::new("less-loader")),
        css_rule("sass", Matcher::new(r"\.s[ac]ss$")?).extension(LoaderSpec::new("sass-loader")),
    ]))
}

pub fn plugin_registry() -> Vec<PluginSpec> {
    vec![
        PluginSpec::new("html-template")
            .with_options(json!({
                "template": "./index.html",
                "minify": { "collapseWhitespace": false }
            }))
            .with_override(
                BuildMode::Production,
                json!({ "minify": { "collapseWhitespace": true } }),
            ),
        PluginSpec::new("clean"),
        PluginSpec::new("copy").with_options(json!({
            "patterns": [{ "from": "src/favicon.ico", "to": "dist" }]
        })),
        PluginSpec::new("css-extract").emits("css"),
        PluginSpec::new("bundle-analyzer").only_in(BuildMode::Production),
    ]
}
