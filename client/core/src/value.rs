//! Helpers for reading opaque entity JSON

use serde_json::Value;

/// Follow a dotted path (`"group.room.name"`) into an entity
pub fn value_at<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(item, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// String form of a scalar; `None` for null, arrays and objects
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Human readable rendering used by list rows and detail items
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Ja".into(),
        Value::Bool(false) => "Nein".into(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => ["name", "label", "title"]
            .iter()
            .find_map(|k| map.get(*k).and_then(scalar_string))
            .unwrap_or_else(|| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_at_paths() {
        let item = json!({"group": {"name": "Rot", "teachers": [{"name": "A"}]}});
        assert_eq!(value_at(&item, "group.name"), Some(&json!("Rot")));
        assert_eq!(value_at(&item, "group.teachers.0.name"), Some(&json!("A")));
        assert_eq!(value_at(&item, "group.missing"), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(true)), "Ja");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(["a", {"name": "b"}, null])), "a, b");
        assert_eq!(display_value(&json!({"label": "X"})), "X");
    }
}
