//! Per-mode option overrides for loaders and plugins.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::mode::BuildMode;

pub type Options = Map<String, Value>;

/// Mode-keyed overrides, deep-merged over the base options of the owner.
pub type ModeOverrides = BTreeMap<BuildMode, Value>;

/// Options for `mode`: `base` with the matching override merged on top.
pub(crate) fn options_for_mode(
    target: &str,
    base: &Options,
    overrides: &ModeOverrides,
    mode: BuildMode,
) -> Result<Options> {
    let Some(update) = overrides.get(&mode) else {
        return Ok(base.clone());
    };

    match update {
        Value::Null => Ok(base.clone()),
        Value::Object(update_map) => {
            let mut merged = base.clone();
            for (key, value) in update_map {
                merge_values(merged.entry(key.clone()).or_insert(Value::Null), value);
            }
            Ok(merged)
        }
        other => Err(ConfigError::InvalidOverride {
            target: target.to_string(),
            mode,
            message: format!("expected an options object, found {other}"),
        }),
    }
}

fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn missing_override_keeps_base() {
        let base = object(json!({ "template": "./index.html" }));
        let merged =
            options_for_mode("html", &base, &ModeOverrides::new(), BuildMode::Production).unwrap();
        assert_eq!(merged, base);
    }

    #[test]
    fn nested_objects_merge_key_wise() {
        let base = object(json!({
            "template": "./index.html",
            "minify": { "collapseWhitespace": false, "removeComments": true }
        }));
        let mut overrides = ModeOverrides::new();
        overrides.insert(
            BuildMode::Production,
            json!({ "minify": { "collapseWhitespace": true } }),
        );

        let merged = options_for_mode("html", &base, &overrides, BuildMode::Production).unwrap();
        assert_eq!(
            Value::Object(merged),
            json!({
                "template": "./index.html",
                "minify": { "collapseWhitespace": true, "removeComments": true }
            })
        );

        let untouched = options_for_mode("html", &base, &overrides, BuildMode::Development).unwrap();
        assert_eq!(untouched, base);
    }

    #[test]
    fn arrays_replace() {
        let base = object(json!({ "presets": ["env"] }));
        let mut overrides = ModeOverrides::new();
        overrides.insert(BuildMode::Development, json!({ "presets": ["env", "react"] }));

        let merged = options_for_mode("babel", &base, &overrides, BuildMode::Development).unwrap();
        assert_eq!(merged["presets"], json!(["env", "react"]));
    }

    #[test]
    fn non_object_override_is_rejected() {
        let mut overrides = ModeOverrides::new();
        overrides.insert(BuildMode::Production, json!(true));

        let err = options_for_mode("html", &Options::new(), &overrides, BuildMode::Production)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride { .. }));
    }
}
