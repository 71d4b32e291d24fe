//! Named entry bundles.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Result};

/// A named root bundle and the modules it starts from, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDeclaration {
    name: String,
    /// Missing sources deserialize as empty so assembly reports
    /// [`ConfigError::EmptyEntry`].
    #[serde(default, deserialize_with = "one_or_many")]
    sources: Vec<String>,
}

impl EntryDeclaration {
    pub fn new<S: Into<String>>(name: impl Into<String>, sources: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Name pattern, then at least one source.
    pub fn validate(&self) -> Result<()> {
        validate_entry_name(&self.name)?;
        if self.sources.is_empty() {
            return Err(ConfigError::EmptyEntry(self.name.clone()));
        }
        Ok(())
    }
}

/// A letter, then letters, digits, `_` or `-`.
pub fn validate_entry_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEntryName(name.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(source) => vec![source],
            OneOrMany::Many(sources) => sources,
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    OneOrMany::deserialize(deserializer).map(Into::into)
}

/// Name → sources pairs in document order. A repeated name is kept as a
/// second pair rather than overwriting the first.
pub(crate) struct EntryPairs(Vec<(String, OneOrMany)>);

impl<'de> Deserialize<'de> for EntryPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = EntryPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of entry names to sources")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<EntryPairs, A::Error> {
                let mut pairs = Vec::new();
                while let Some(pair) = map.next_entry::<String, OneOrMany>()? {
                    pairs.push(pair);
                }
                Ok(EntryPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// Entries as written in declarations: a name → sources table, or a list
/// of `{ name, sources }` objects. Both forms keep duplicate names for
/// assembly to reject. A parsed `serde_json::Value` has already collapsed
/// repeated keys, so JSON text should be read with
/// [`BuildDeclarations::from_json_str`](crate::BuildDeclarations::from_json_str).
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum EntryTable {
    Table(EntryPairs),
    List(Vec<EntryDeclaration>),
}

impl From<EntryTable> for Vec<EntryDeclaration> {
    fn from(table: EntryTable) -> Self {
        match table {
            EntryTable::Table(EntryPairs(pairs)) => pairs
                .into_iter()
                .map(|(name, sources)| EntryDeclaration {
                    name,
                    sources: sources.into(),
                })
                .collect(),
            EntryTable::List(list) => list,
        }
    }
}
