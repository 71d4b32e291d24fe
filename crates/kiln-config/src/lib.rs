//! Build configuration engine.
//!
//! Turns entry declarations, file-type rules, a plugin registry and a raw
//! mode flag into one validated, immutable [`BuildPlan`]. Every step is a
//! pure function of its inputs; the mode flag is read once by
//! [`EnvironmentPolicy::resolve`] and passed down explicitly.

pub mod assembler;
pub mod chain;
pub mod declarations;
pub mod defaults;
pub mod discovery;
pub mod entry;
pub mod error;
pub mod loader;
pub mod mode;
pub mod output;
pub mod overrides;
pub mod plan;
pub mod plugin;
pub mod resolve;
pub mod rules;

pub use assembler::{
    BuildConfigAssembler, DevServerSettings, OutputSettings, PlanSettings,
};
pub use chain::{ChainResolver, ResolvedChain};
pub use declarations::BuildDeclarations;
pub use discovery::{discover, load_file, ConfigDiscovery};
pub use entry::{validate_entry_name, EntryDeclaration};
pub use error::{ConfigError, Result};
pub use loader::LoaderSpec;
pub use mode::{BuildMode, DevServerPolicy, EnvironmentPolicy, DEFAULT_DEV_SERVER_PORT};
pub use output::{
    ChunkSplitting, OptimizationPolicy, OutputNamer, OutputPolicy, HASH_PLACEHOLDER,
    NAME_PLACEHOLDER,
};
pub use overrides::{ModeOverrides, Options};
pub use plan::BuildPlan;
pub use plugin::{PluginAssembler, PluginSpec};
pub use resolve::{ModuleReference, ResolveOptions};
pub use rules::{FileTypeRule, Matcher, RuleTable};
