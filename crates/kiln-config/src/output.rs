//! Output filename patterns and optimization settings.
//!
//! Nothing here hashes content. Production patterns carry the
//! [`HASH_PLACEHOLDER`] token and the executor substitutes the digest.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::mode::EnvironmentPolicy;

/// Replaced by the executor with a digest of the emitted file.
pub const HASH_PLACEHOLDER: &str = "[contenthash]";

/// Replaced by the executor with the entry or chunk name.
pub const NAME_PLACEHOLDER: &str = "[name]";

pub const DEFAULT_BASE_PATH: &str = "dist";

/// Asset kind every plan names, since every entry emits a script bundle.
pub const SCRIPT_KIND: &str = "js";

/// Computes filename patterns per asset kind.
pub struct OutputNamer;

impl OutputNamer {
    /// Filename pattern for `asset_kind` (an extension such as `js` or `css`).
    ///
    /// ```
    /// use kiln_config::{BuildMode, EnvironmentPolicy, OutputNamer};
    ///
    /// let prod = EnvironmentPolicy::new(BuildMode::Production);
    /// assert_eq!(OutputNamer::name_for("js", &prod), "[name].[contenthash].js");
    ///
    /// let dev = EnvironmentPolicy::new(BuildMode::Development);
    /// assert_eq!(OutputNamer::name_for(".css", &dev), "[name].css");
    /// ```
    pub fn name_for(asset_kind: &str, policy: &EnvironmentPolicy) -> String {
        let kind = asset_kind.trim_start_matches('.');
        if policy.hash_filenames() {
            format!("{NAME_PLACEHOLDER}.{HASH_PLACEHOLDER}.{kind}")
        } else {
            format!("{NAME_PLACEHOLDER}.{kind}")
        }
    }

    /// Output policy naming the script kind plus every kind in `asset_kinds`.
    pub fn output_policy<'a>(
        asset_kinds: impl IntoIterator<Item = &'a str>,
        base_path: &str,
        policy: &EnvironmentPolicy,
    ) -> OutputPolicy {
        let mut filenames = IndexMap::new();
        for kind in std::iter::once(SCRIPT_KIND).chain(asset_kinds) {
            let kind = kind.trim_start_matches('.');
            filenames
                .entry(kind.to_string())
                .or_insert_with(|| Self::name_for(kind, policy));
        }

        OutputPolicy {
            filenames,
            include_content_hash: policy.hash_filenames(),
            base_path: base_path.to_string(),
        }
    }
}

/// Filename patterns and output location, derived from the build mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputPolicy {
    filenames: IndexMap<String, String>,
    include_content_hash: bool,
    base_path: String,
}

impl OutputPolicy {
    pub fn filename(&self, asset_kind: &str) -> Option<&str> {
        self.filenames
            .get(asset_kind.trim_start_matches('.'))
            .map(String::as_str)
    }

    pub fn filenames(&self) -> &IndexMap<String, String> {
        &self.filenames
    }

    pub fn include_content_hash(&self) -> bool {
        self.include_content_hash
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

/// Which chunks are candidates for shared-chunk splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSplitting {
    #[default]
    All,
    Async,
    Initial,
}

/// Chunk splitting and minimizer selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationPolicy {
    split_chunks: ChunkSplitting,
    minimizers: Vec<String>,
}

impl OptimizationPolicy {
    /// Minimizers run only when the policy minifies.
    pub fn for_policy(policy: &EnvironmentPolicy, split_chunks: ChunkSplitting) -> Self {
        let minimizers = if policy.minify() {
            vec!["css-minimizer".to_string(), "terser".to_string()]
        } else {
            Vec::new()
        };
        Self {
            split_chunks,
            minimizers,
        }
    }

    pub fn split_chunks(&self) -> ChunkSplitting {
        self.split_chunks
    }

    pub fn minimizers(&self) -> &[String] {
        &self.minimizers
    }
}
