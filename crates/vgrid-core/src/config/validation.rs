//! Config validation - warns about unknown fields

use serde_json::Value;
use tracing::warn;

const KNOWN_KEYS: [&str; 7] = [
    "columns",
    "iconSize",
    "iconSpacing",
    "favoritesSection",
    "appSorting",
    "favoritesSorting",
    "animateScroll",
];

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    for key in find_unknown_keys(&value) {
        warn!("Unknown config field in {config_name}: {key}");
    }
}

fn find_unknown_keys(value: &Value) -> Vec<String> {
    let Value::Object(obj) = value else {
        return Vec::new();
    };

    obj.keys()
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_no_unknowns() {
        let value: Value =
            serde_json::from_str(r#"{"columns": 6, "iconSize": 48, "animateScroll": false}"#)
                .unwrap();
        assert!(find_unknown_keys(&value).is_empty());
    }

    #[test]
    fn test_unknown_fields_reported() {
        let value: Value =
            serde_json::from_str(r#"{"columns": 6, "icon-size": 48, "colums": 3}"#).unwrap();
        let mut unknowns = find_unknown_keys(&value);
        unknowns.sort();
        assert_eq!(unknowns, vec!["colums", "icon-size"]);
    }

    #[test]
    fn test_non_object_is_ignored() {
        let value: Value = serde_json::from_str("[1, 2]").unwrap();
        assert!(find_unknown_keys(&value).is_empty());
    }

    #[test]
    fn test_invalid_json_does_not_panic() {
        warn_unknown_fields("{not json", "config.json");
    }
}
