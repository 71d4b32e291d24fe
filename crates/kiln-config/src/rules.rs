//! File-type rules and first-match-wins lookup.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};
use crate::loader::LoaderSpec;

/// Regular expression tested against a module reference or filename.
#[derive(Clone)]
pub struct Matcher(Regex);

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Matcher)
            .map_err(|err| ConfigError::InvalidMatcher {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })
    }

    /// Matches filenames ending in `.{ext}` for any of `extensions`.
    ///
    /// ```
    /// use kiln_config::Matcher;
    ///
    /// let images = Matcher::extensions(&["png", "svg"]).unwrap();
    /// assert!(images.is_match("./logo.svg"));
    /// assert!(!images.is_match("./logo.svg.js"));
    /// ```
    pub fn extensions(extensions: &[&str]) -> Result<Self> {
        let alternatives = extensions
            .iter()
            .map(|ext| regex::escape(ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(&format!(r"\.({alternatives})$"))
    }

    pub fn extension(extension: &str) -> Result<Self> {
        Self::extensions(&[extension])
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, filename: &str) -> bool {
        self.0.is_match(filename)
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Matcher {}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Matcher::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Maps a file-type pattern to its loader chain template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTypeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    test: Matcher,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exclude: Vec<Matcher>,

    /// Loader steps in declaration order.
    #[serde(default)]
    chain: Vec<LoaderSpec>,

    /// Declares a pluggable trailing stage even when none is filled in.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    extensible: bool,

    /// Trailing stage appended after the template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extension: Option<LoaderSpec>,
}

impl FileTypeRule {
    pub fn new(test: Matcher) -> Self {
        Self {
            name: None,
            test,
            exclude: Vec::new(),
            chain: Vec::new(),
            extensible: false,
            extension: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn exclude(mut self, matcher: Matcher) -> Self {
        self.exclude.push(matcher);
        self
    }

    pub fn loader(mut self, loader: LoaderSpec) -> Self {
        self.chain.push(loader);
        self
    }

    /// Open an empty extension point for callers to fill.
    pub fn extensible(mut self) -> Self {
        self.extensible = true;
        self
    }

    pub fn extension(mut self, loader: LoaderSpec) -> Self {
        self.extensible = true;
        self.extension = Some(loader);
        self
    }

    /// Explicit name, or the test pattern when none was declared.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.test.as_str())
    }

    pub fn test(&self) -> &Matcher {
        &self.test
    }

    pub fn excludes(&self) -> &[Matcher] {
        &self.exclude
    }

    pub fn chain_template(&self) -> &[LoaderSpec] {
        &self.chain
    }

    pub fn extension_stage(&self) -> Option<&LoaderSpec> {
        self.extension.as_ref()
    }

    pub fn has_extension_point(&self) -> bool {
        self.extensible || self.extension.is_some()
    }

    /// Exclude patterns are checked first; an excluded file never matches.
    pub fn matches(&self, filename: &str) -> bool {
        if self.exclude.iter().any(|m| m.is_match(filename)) {
            return false;
        }
        self.test.is_match(filename)
    }
}

/// Ordered list of [`FileTypeRule`]s.
///
/// Lookup is first-match-wins in declaration order: when several rules would
/// accept a filename, the earliest declared one is returned and the others
/// are never consulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<FileTypeRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<FileTypeRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: FileTypeRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[FileTypeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule accepting `filename`, or `None` when nothing matches.
    pub fn match_file(&self, filename: &str) -> Option<&FileTypeRule> {
        self.rules.iter().find(|rule| rule.matches(filename))
    }

    /// Rule names must be unique; they key the resolved chains of a plan.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.rules.len());
        for rule in &self.rules {
            if !seen.insert(rule.name()) {
                return Err(ConfigError::DuplicateRule(rule.name().to_string()));
            }
        }
        Ok(())
    }
}

impl FromIterator<FileTypeRule> for RuleTable {
    fn from_iter<T: IntoIterator<Item = FileTypeRule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
