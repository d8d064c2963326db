//! Typed accessors over a resource's attribute map.
//!
//! Attributes arrive as loosely typed JSON. These helpers never fail: a
//! missing or mistyped attribute reads as the empty value of the requested
//! type.

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

/// Attribute as display text. Numbers and booleans are stringified.
pub fn string_attr(attrs: &Map<String, Value>, key: &str) -> String {
    match attrs.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// [`string_attr`] with surrounding whitespace removed.
pub fn trimmed_attr(attrs: &Map<String, Value>, key: &str) -> String {
    string_attr(attrs, key).trim().to_string()
}

/// Attribute as a boolean; `"true"` strings count.
pub fn bool_attr(attrs: &Map<String, Value>, key: &str) -> bool {
    opt_bool_attr(attrs, key).unwrap_or(false)
}

/// Attribute as a boolean, `None` when absent or not boolean-like.
pub fn opt_bool_attr(attrs: &Map<String, Value>, key: &str) -> Option<bool> {
    match attrs.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Attribute as a number; numeric strings are parsed.
pub fn number_attr(attrs: &Map<String, Value>, key: &str) -> Option<f64> {
    match attrs.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Attribute as a list of strings; a scalar string becomes a one-element list.
pub fn string_list_attr(attrs: &Map<String, Value>, key: &str) -> Vec<String> {
    match attrs.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Raw attribute value, `Value::Null` when absent.
pub fn raw_attr(attrs: &Map<String, Value>, key: &str) -> Value {
    attrs.get(key).cloned().unwrap_or(Value::Null)
}

/// First value that is non-empty after trimming.
pub fn first_non_empty<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Render an ISO-8601 date or timestamp as `YYYY-MM-DD`.
///
/// Unparseable input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// Render an ISO-8601 timestamp as `YYYY-MM-DD HH:MM` (UTC offset kept).
pub fn format_datetime(raw: &str) -> String {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_string_attr_coerces_scalars() {
        let a = attrs(json!({"name": "Acme", "count": 4, "flag": true, "none": null, "list": [1]}));
        assert_eq!(string_attr(&a, "name"), "Acme");
        assert_eq!(string_attr(&a, "count"), "4");
        assert_eq!(string_attr(&a, "flag"), "true");
        assert_eq!(string_attr(&a, "none"), "");
        assert_eq!(string_attr(&a, "list"), "");
        assert_eq!(string_attr(&a, "missing"), "");
    }

    #[test]
    fn test_bool_and_number_attrs() {
        let a = attrs(json!({"a": true, "b": "false", "c": "maybe", "n": "2.5", "m": 3}));
        assert!(bool_attr(&a, "a"));
        assert_eq!(opt_bool_attr(&a, "b"), Some(false));
        assert_eq!(opt_bool_attr(&a, "c"), None);
        assert!(!bool_attr(&a, "missing"));
        assert_eq!(number_attr(&a, "n"), Some(2.5));
        assert_eq!(number_attr(&a, "m"), Some(3.0));
        assert_eq!(number_attr(&a, "a"), None);
    }

    #[test]
    fn test_string_list_attr() {
        let a = attrs(json!({"tags": ["x", 2, null], "one": "solo", "blank": ""}));
        assert_eq!(string_list_attr(&a, "tags"), vec!["x", "2"]);
        assert_eq!(string_list_attr(&a, "one"), vec!["solo"]);
        assert!(string_list_attr(&a, "blank").is_empty());
    }

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(["", "  ", " Acme "]), "Acme");
        assert_eq!(first_non_empty(Vec::<String>::new()), "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-01-31T22:15:00Z"), "2025-01-31");
        assert_eq!(format_date("2025-01-31"), "2025-01-31");
        assert_eq!(format_date("next week"), "next week");
        assert_eq!(format_date(""), "");
        assert_eq!(format_datetime("2025-01-31T22:15:00Z"), "2025-01-31 22:15");
    }
}
