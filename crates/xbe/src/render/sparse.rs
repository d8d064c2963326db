//! Sparse-fieldset output.
//!
//! With `--fields`, row building is skipped: each primary resource is
//! re-emitted as `{id, <field>: <value>...}` straight from the payload.

use serde_json::{Map, Value};

use crate::jsonapi::{Linkage, Resource};

use super::table::Table;

/// Column budget for sparse table cells.
const SPARSE_CELL_MAX: usize = 40;

/// Parse a `--fields` value into trimmed, de-duplicated field names.
pub fn parse_fields(raw: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for field in raw.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
    }
    fields
}

/// Value of `field` on `resource`: attribute first, then relationship linkage.
pub fn field_value(resource: &Resource, field: &str) -> Value {
    if let Some(value) = resource.attributes.get(field) {
        return value.clone();
    }
    match resource.relationships.get(field).map(|r| r.data.as_ref()) {
        Some(Some(Linkage::One(identifier))) => Value::String(identifier.id.clone()),
        Some(Some(Linkage::Many(ids))) => {
            Value::Array(ids.iter().map(|i| Value::String(i.id.clone())).collect())
        }
        _ => Value::Null,
    }
}

/// `{id, fields...}` object for one resource.
pub fn sparse_object(resource: &Resource, fields: &[String]) -> Value {
    let mut object = Map::new();
    object.insert("id".to_string(), Value::String(resource.id.clone()));
    for field in fields {
        if field == "id" {
            continue;
        }
        object.insert(field.clone(), field_value(resource, field));
    }
    Value::Object(object)
}

/// Display text for a raw JSON cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// ID column plus one upper-cased column per field.
pub fn sparse_table(resources: &[Resource], fields: &[String]) -> Table {
    let mut table = Table::new().column("ID");
    let fields: Vec<&String> = fields.iter().filter(|f| *f != "id").collect();
    for field in &fields {
        table = table.truncated(field.to_uppercase().replace('-', " "), SPARSE_CELL_MAX);
    }
    for resource in resources {
        let mut cells = vec![resource.id.clone()];
        cells.extend(
            fields
                .iter()
                .map(|field| cell_text(&field_value(resource, field))),
        );
        table.add_row(cells);
    }
    table
}
