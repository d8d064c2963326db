//! JSON output.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Remove `null` members from every object, recursively.
///
/// Nulls inside arrays are kept so positions stay meaningful.
pub fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Write `value` as indented JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(
    out: &mut dyn Write,
    value: &T,
    omit_null: bool,
) -> Result<()> {
    let mut value = serde_json::to_value(value)?;
    if omit_null {
        strip_nulls(&mut value);
    }
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_list_is_empty_array() {
        let mut out = Vec::new();
        let rows: Vec<Value> = Vec::new();
        write_json(&mut out, &rows, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_strip_nulls_recurses_into_objects() {
        let mut value = json!({
            "id": "1",
            "label": null,
            "nested": {"a": null, "b": 2},
            "list": [null, {"c": null}]
        });
        strip_nulls(&mut value);
        assert_eq!(
            value,
            json!({"id": "1", "nested": {"b": 2}, "list": [null, {}]})
        );
    }

    #[test]
    fn test_write_json_is_indented() {
        let mut out = Vec::new();
        write_json(&mut out, &json!({"id": "1", "x": null}), true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"id\": \"1\"\n}\n");
    }
}
