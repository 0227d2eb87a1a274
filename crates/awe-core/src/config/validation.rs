//! Config validation - warns about unknown fields

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_config_keys();
    let unknowns = find_unknown_keys(&value, &expected, "");

    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "general.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if let Some(entry) = expected.maps.get(key.as_str()) {
            // User-named entries (set names): only their contents are checked
            if let Value::Object(entries) = child {
                for (name, entry_value) in entries {
                    unknowns.extend(find_unknown_keys(
                        entry_value,
                        entry,
                        &format!("{path}.{name}"),
                    ));
                }
            }
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys,
/// `maps` are objects keyed by user-chosen names whose values share one shape.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
    maps: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
            maps: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }

    fn with_map(mut self, key: &'static str, entry: ExpectedKeys) -> Self {
        self.maps.insert(key, entry);
        self
    }
}

fn layout_keys() -> ExpectedKeys {
    ExpectedKeys::new(&["width", "height", "anchor", "margin", "layer"])
}

/// Expected keys for `Config` (settings.rs)
fn expected_config_keys() -> ExpectedKeys {
    let general_keys = ExpectedKeys::new(&["fallback", "terminal", "defaultMode"]);

    let set_keys = ExpectedKeys::new(&["providers", "prompt", "icon", "pins", "aliases"])
        .with_nested("filter", ExpectedKeys::new(&["include", "exclude"]))
        .with_nested("layout", layout_keys());

    let provider_keys = ExpectedKeys::new(&[])
        .with_nested("top", ExpectedKeys::new(&["limit", "sort", "showSystem"]))
        .with_nested("ssh", ExpectedKeys::new(&["parseKnownHosts"]));

    ExpectedKeys::new(&["pins", "aliases"])
        .with_nested("general", general_keys)
        .with_nested("window", layout_keys())
        .with_nested("providers", provider_keys)
        .with_nested("history", ExpectedKeys::new(&["maxEntries"]))
        .with_map("sets", set_keys)
}
