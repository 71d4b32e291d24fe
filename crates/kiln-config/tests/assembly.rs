//! End-to-end plan assembly behavior.

use std::sync::Arc;
use std::thread;

use kiln_config::{
    BuildConfigAssembler, BuildMode, BuildPlan, ConfigError, EntryDeclaration, FileTypeRule,
    LoaderSpec, Matcher, PluginSpec, RuleTable, HASH_PLACEHOLDER,
};

fn scenario_rules() -> RuleTable {
    RuleTable::new(vec![
        FileTypeRule::new(Matcher::extension("ts").expect("ts matcher"))
            .named("ts")
            .loader(LoaderSpec::new("typescript-transform"))
            .loader(LoaderSpec::new("type-lint").only_in(BuildMode::Development)),
        FileTypeRule::new(Matcher::extension("jsx").expect("jsx matcher"))
            .named("jsx")
            .loader(LoaderSpec::new("react-transform")),
    ])
}

fn scenario_entries() -> Vec<EntryDeclaration> {
    vec![
        EntryDeclaration::new("main", ["./index.jsx"]),
        EntryDeclaration::new("analytics", ["./analytics.ts"]),
    ]
}

fn scenario_plugins() -> Vec<PluginSpec> {
    vec![
        PluginSpec::new("clean"),
        PluginSpec::new("html-template"),
        PluginSpec::new("bundle-analyzer").only_in(BuildMode::Production),
    ]
}

#[test]
fn production_scenario() {
    let plan = BuildConfigAssembler::assemble(
        &scenario_entries(),
        &scenario_rules(),
        &scenario_plugins(),
        Some("production"),
    )
    .expect("assemble");

    assert_eq!(plan.mode(), BuildMode::Production);
    assert_eq!(plan.entries().len(), 2);
    assert!(plan.entry("main").is_some());
    assert!(plan.entry("analytics").is_some());

    let chains = plan.resolved_chains();
    assert_eq!(chains.len(), 2);
    assert_eq!(chains["ts"].tool_ids(), vec!["typescript-transform"]);
    assert_eq!(chains["jsx"].tool_ids(), vec!["react-transform"]);
    assert!(chains
        .values()
        .flat_map(|chain| chain.loaders())
        .all(|step| step.restricted_to() != Some(BuildMode::Development)));

    assert!(plan.output().include_content_hash());
    assert!(plan.output().filename("js").expect("js pattern").contains(HASH_PLACEHOLDER));
    assert_eq!(plan.plugins().len(), 3);
    assert!(plan.policy().minify());
    assert_eq!(plan.optimization().minimizers().len(), 2);
}

#[test]
fn bare_module_names_assemble_as_package_references() {
    let entries = vec![
        EntryDeclaration::new("main", ["index"]),
        EntryDeclaration::new("analytics", ["analytics"]),
    ];
    let plan = BuildConfigAssembler::assemble(
        &entries,
        &scenario_rules(),
        &scenario_plugins(),
        Some("production"),
    )
    .expect("assemble");

    assert_eq!(plan.entries().len(), 2);
    assert!(plan.asset_rules().is_empty());
    assert_eq!(plan.resolved_chains()["ts"].tool_ids(), vec!["typescript-transform"]);
    assert_eq!(plan.resolved_chains()["jsx"].tool_ids(), vec!["react-transform"]);
    assert!(plan.output().include_content_hash());
}

#[test]
fn bare_filename_without_rule_fails() {
    let entries = vec![EntryDeclaration::new("main", ["index.wasm"])];
    let result = BuildConfigAssembler::assemble(&entries, &scenario_rules(), &[], None);
    assert!(matches!(
        result,
        Err(ConfigError::NoMatchingRule { entry, asset }) if entry == "main" && asset == "index.wasm"
    ));

    let entries = vec![EntryDeclaration::new("main", ["index.jsx"])];
    let plan = BuildConfigAssembler::assemble(&entries, &scenario_rules(), &[], None)
        .expect("assemble");
    assert_eq!(plan.asset_rules()["index.jsx"], "jsx");
}

#[test]
fn development_scenario_keeps_dev_steps() {
    let plan = BuildConfigAssembler::assemble(
        &scenario_entries(),
        &scenario_rules(),
        &scenario_plugins(),
        Some("development"),
    )
    .expect("assemble");

    assert_eq!(
        plan.resolved_chains()["ts"].tool_ids(),
        vec!["typescript-transform", "type-lint"]
    );
    assert!(!plan.output().include_content_hash());
    assert_eq!(plan.output().filename("js"), Some("[name].js"));
    assert_eq!(plan.plugins().len(), 2);
    assert!(plan.optimization().minimizers().is_empty());
}

#[test]
fn unknown_mode_flag_assembles_development_plan() {
    let plan = BuildConfigAssembler::assemble(
        &scenario_entries(),
        &scenario_rules(),
        &scenario_plugins(),
        Some("qa"),
    )
    .expect("assemble");
    assert_eq!(plan.mode(), BuildMode::Development);
}

#[test]
fn assembly_is_deterministic() {
    let assemble = |mode| {
        BuildConfigAssembler::assemble(
            &scenario_entries(),
            &scenario_rules(),
            &scenario_plugins(),
            mode,
        )
        .expect("assemble")
    };

    for mode in [None, Some("production"), Some("development")] {
        let first = assemble(mode);
        let second = assemble(mode);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }
}

#[test]
fn duplicate_main_entry_yields_no_plan() {
    let entries = vec![
        EntryDeclaration::new("main", ["./index.jsx"]),
        EntryDeclaration::new("main", ["./analytics.ts"]),
    ];
    let result =
        BuildConfigAssembler::assemble(&entries, &scenario_rules(), &scenario_plugins(), None);
    match result {
        Err(ConfigError::DuplicateEntryName(name)) => assert_eq!(name, "main"),
        other => panic!("expected DuplicateEntryName, got {other:?}"),
    }
}

#[test]
fn duplicate_clean_plugin_fails() {
    let plugins = vec![
        PluginSpec::new("clean"),
        PluginSpec::new("copy"),
        PluginSpec::new("clean"),
    ];
    let result =
        BuildConfigAssembler::assemble(&scenario_entries(), &scenario_rules(), &plugins, None);
    match result {
        Err(ConfigError::DuplicatePlugin { id, mode }) => {
            assert_eq!(id, "clean");
            assert_eq!(mode, BuildMode::Development);
        }
        other => panic!("expected DuplicatePlugin, got {other:?}"),
    }
}

#[test]
fn dead_plugin_configuration_fails() {
    let plugins = vec![PluginSpec::new("clean").active_in(Vec::new())];
    let result = BuildConfigAssembler::assemble(
        &scenario_entries(),
        &scenario_rules(),
        &plugins,
        Some("production"),
    );
    assert!(matches!(
        result,
        Err(ConfigError::DeadPluginConfiguration(id)) if id == "clean"
    ));
}

#[test]
fn unmatched_asset_fails_before_plugins_are_checked() {
    let entries = vec![EntryDeclaration::new("styles", ["./theme.less"])];
    let plugins = vec![PluginSpec::new("clean"), PluginSpec::new("clean")];
    let result = BuildConfigAssembler::assemble(&entries, &scenario_rules(), &plugins, None);
    assert!(matches!(result, Err(ConfigError::NoMatchingRule { .. })));
}

#[test]
fn invalid_entry_name_fails() {
    let entries = vec![EntryDeclaration::new("main.bundle", ["./index.jsx"])];
    let result = BuildConfigAssembler::assemble(&entries, &scenario_rules(), &[], None);
    assert!(matches!(result, Err(ConfigError::InvalidEntryName(name)) if name == "main.bundle"));
}

#[test]
fn plan_is_shareable_across_threads() {
    let plan: Arc<BuildPlan> = Arc::new(
        BuildConfigAssembler::assemble(
            &scenario_entries(),
            &scenario_rules(),
            &scenario_plugins(),
            Some("production"),
        )
        .expect("assemble"),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let plan = Arc::clone(&plan);
            thread::spawn(move || plan.chain_for("./widgets/Counter.jsx").map(|(rule, _)| rule.name().to_string()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("thread"), Some("jsx".to_string()));
    }
}

#[test]
fn independent_assemblies_run_concurrently() {
    let handles: Vec<_> = ["development", "production", "development", "production"]
        .into_iter()
        .map(|mode| {
            thread::spawn(move || {
                BuildConfigAssembler::assemble(
                    &scenario_entries(),
                    &scenario_rules(),
                    &scenario_plugins(),
                    Some(mode),
                )
                .expect("assemble")
            })
        })
        .collect();

    let plans: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .collect();
    assert_eq!(plans[0], plans[2]);
    assert_eq!(plans[1], plans[3]);
    assert_ne!(plans[0], plans[1]);
}
