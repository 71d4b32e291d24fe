//! Module resolution settings and module reference classification.
//!
//! An entry source is a local file when it is relative (`./`, `../`),
//! absolute, aliased, or a bare filename carrying an extension
//! (`index.wasm`). Local files must be covered by a rule. Extensionless bare
//! names (`index`, `react-dom/client`) and scoped specifiers
//! (`@babel/polyfill`) are package references left to the executor.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

fn default_extensions() -> Vec<String> {
    vec![".js".into(), ".json".into(), ".png".into()]
}

/// Extensions tried for extensionless imports, and import path aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveOptions {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Import prefix → directory (e.g. `"@"` → `src`).
    #[serde(default)]
    pub aliases: IndexMap<String, PathBuf>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            aliases: IndexMap::new(),
        }
    }
}

fn is_bare_file(reference: &str) -> bool {
    !reference.starts_with('@') && Path::new(reference).extension().is_some()
}

/// How an entry source is treated during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleReference<'a> {
    /// A project file; it must be covered by a rule.
    Local(&'a str),
    /// An installed package, resolved by the executor.
    Package(&'a str),
}

impl ResolveOptions {
    /// Relative, absolute, aliased and bare-with-extension references are
    /// local, anything else is a package specifier.
    ///
    /// ```
    /// use kiln_config::{ModuleReference, ResolveOptions};
    ///
    /// let resolve = ResolveOptions::default();
    /// assert_eq!(resolve.classify("./index.jsx"), ModuleReference::Local("./index.jsx"));
    /// assert_eq!(resolve.classify("index.wasm"), ModuleReference::Local("index.wasm"));
    /// assert_eq!(
    ///     resolve.classify("@babel/polyfill"),
    ///     ModuleReference::Package("@babel/polyfill")
    /// );
    /// assert_eq!(resolve.classify("index"), ModuleReference::Package("index"));
    /// ```
    pub fn classify<'a>(&self, reference: &'a str) -> ModuleReference<'a> {
        let relative = reference.starts_with("./")
            || reference.starts_with("../")
            || reference.starts_with('/');

        if relative || self.is_aliased(reference) || is_bare_file(reference) {
            ModuleReference::Local(reference)
        } else {
            ModuleReference::Package(reference)
        }
    }

    fn is_aliased(&self, reference: &str) -> bool {
        self.aliases.keys().any(|alias| {
            reference == alias
                || reference
                    .strip_prefix(alias.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Filenames to match rules against, in lookup order.
    ///
    /// A reference with an extension is its own only candidate; an
    /// extensionless one is tried with each configured extension.
    pub fn candidates(&self, reference: &str) -> Vec<String> {
        if Path::new(reference).extension().is_some() {
            return vec![reference.to_string()];
        }
        self.extensions
            .iter()
            .map(|ext| {
                if ext.starts_with('.') {
                    format!("{reference}{ext}")
                } else {
                    format!("{reference}.{ext}")
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_aliases() -> ResolveOptions {
        let mut resolve = ResolveOptions::default();
        resolve.aliases.insert("@".into(), PathBuf::from("src"));
        resolve.aliases.insert("models".into(), PathBuf::from("src/models"));
        resolve
    }

    #[test]
    fn relative_and_absolute_are_local() {
        let resolve = ResolveOptions::default();
        assert!(matches!(resolve.classify("./a.ts"), ModuleReference::Local(_)));
        assert!(matches!(resolve.classify("../a.ts"), ModuleReference::Local(_)));
        assert!(matches!(resolve.classify("/abs/a.ts"), ModuleReference::Local(_)));
    }

    #[test]
    fn aliases_are_local() {
        let resolve = with_aliases();
        assert!(matches!(resolve.classify("@/app.ts"), ModuleReference::Local(_)));
        assert!(matches!(resolve.classify("models/user.ts"), ModuleReference::Local(_)));
        // scoped packages share the "@" prefix but not "@/"
        assert!(matches!(
            resolve.classify("@babel/polyfill"),
            ModuleReference::Package(_)
        ));
        assert!(matches!(resolve.classify("modelsx"), ModuleReference::Package(_)));
    }

    #[test]
    fn bare_filenames_with_extension_are_local() {
        let resolve = ResolveOptions::default();
        assert_eq!(resolve.classify("index.wasm"), ModuleReference::Local("index.wasm"));
        assert_eq!(resolve.classify("src/app.ts"), ModuleReference::Local("src/app.ts"));
        assert_eq!(resolve.classify("index"), ModuleReference::Package("index"));
        assert_eq!(
            resolve.classify("react-dom/client"),
            ModuleReference::Package("react-dom/client")
        );
        assert_eq!(
            resolve.classify("@scope/lib.js"),
            ModuleReference::Package("@scope/lib.js")
        );
    }

    #[test]
    fn candidates_keep_explicit_extension() {
        let resolve = ResolveOptions::default();
        assert_eq!(resolve.candidates("./index.jsx"), vec!["./index.jsx"]);
    }

    #[test]
    fn candidates_expand_extensionless_reference() {
        let mut resolve = ResolveOptions::default();
        resolve.extensions = vec![".ts".into(), "js".into()];
        assert_eq!(resolve.candidates("./index"), vec!["./index.ts", "./index.js"]);
    }
}
