//! Create/update request bodies from flag values.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::error::{Result, XbeError};
use crate::jsonapi::ResourceIdentifier;

use super::definition::{AttrKind, AttributeSpec, RelationshipSpec, RelationshipTarget, ResourceDefinition};

/// Value of one create/update flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// The flag was not given.
    #[default]
    Absent,
    /// The flag was given with an empty value.
    Empty,
    /// The flag was given with a value.
    Set(String),
}

impl FieldValue {
    /// `Empty` for blank text, `Set` otherwise.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Set(trimmed.to_string())
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_set(&self) -> Option<&str> {
        match self {
            FieldValue::Set(v) => Some(v),
            _ => None,
        }
    }
}

/// Flag values keyed by flag name. Missing flags are [`FieldValue::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: IndexMap<String, FieldValue>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, flag: impl Into<String>, value: FieldValue) -> &mut Self {
        if !value.is_absent() {
            self.values.insert(flag.into(), value);
        }
        self
    }

    /// Builder form of [`insert`](Self::insert) from raw flag text.
    pub fn with(mut self, flag: impl Into<String>, raw: &str) -> Self {
        self.insert(flag, FieldValue::from_text(raw));
        self
    }

    pub fn get(&self, flag: &str) -> Option<&FieldValue> {
        self.values.get(flag)
    }

    /// Value of `flag` when it was given non-empty.
    pub fn text(&self, flag: &str) -> Option<&str> {
        self.get(flag).and_then(FieldValue::as_set)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Whether blank flags are dropped (create) or sent as clears (update).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Attributes and relationships for a create/update body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBody {
    pub attributes: Map<String, Value>,
    pub relationships: Map<String, Value>,
    /// Identifiers set on relationships, in flag order.
    pub linked: Vec<(&'static str, ResourceIdentifier)>,
}

impl WriteBody {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.relationships.is_empty()
    }

    /// `{"data": {...}}` document. `id` is set for updates.
    pub fn document(&self, kind: &str, id: Option<&str>) -> Value {
        let mut data = Map::new();
        data.insert("type".to_string(), Value::String(kind.to_string()));
        if let Some(id) = id {
            data.insert("id".to_string(), Value::String(id.to_string()));
        }
        if !self.attributes.is_empty() {
            data.insert(
                "attributes".to_string(),
                Value::Object(self.attributes.clone()),
            );
        }
        if !self.relationships.is_empty() {
            data.insert(
                "relationships".to_string(),
                Value::Object(self.relationships.clone()),
            );
        }
        json!({ "data": data })
    }
}

fn invalid(flag: &str, value: &str, expected: &str) -> XbeError {
    XbeError::validation(format!(
        "invalid --{} {:?} (expected {})",
        flag, value, expected
    ))
}

/// Convert flag text to the attribute's JSON value.
pub fn attribute_value(spec: &AttributeSpec, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    match spec.kind {
        AttrKind::String => Ok(Value::String(raw.to_string())),
        AttrKind::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid(spec.flag, raw, "true or false")),
        },
        AttrKind::Int => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid(spec.flag, raw, "an integer")),
        AttrKind::Float => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid(spec.flag, raw, "a number")),
        AttrKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|_| Value::String(raw.to_string()))
            .map_err(|_| invalid(spec.flag, raw, "YYYY-MM-DD")),
        AttrKind::List => Ok(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
        AttrKind::Json => serde_json::from_str(raw).map_err(|e| {
            XbeError::validation(format!("invalid --{} JSON: {}", spec.flag, e))
        }),
    }
}

/// Value sent when an attribute flag is given empty on update.
pub fn cleared_attribute_value(kind: AttrKind) -> Value {
    match kind {
        AttrKind::String | AttrKind::Date => Value::String(String::new()),
        AttrKind::List => Value::Array(Vec::new()),
        AttrKind::Bool => Value::Bool(false),
        _ => Value::Null,
    }
}

/// Parse `Type|ID`, e.g. `Broker|123`, into a JSON:API identifier.
///
/// Known singular names map to their plural type; anything else is
/// lower-cased and pluralized with a trailing `s` unless it already has one.
pub fn parse_organization(raw: &str) -> Result<ResourceIdentifier> {
    let malformed = || {
        XbeError::validation(format!(
            "invalid organization format: {:?} (expected Type|ID, e.g. Broker|123)",
            raw
        ))
    };

    let (kind, id) = raw.split_once('|').ok_or_else(malformed)?;
    let (kind, id) = (kind.trim(), id.trim());
    if kind.is_empty() || id.is_empty() {
        return Err(malformed());
    }

    let lowered = kind.to_lowercase();
    let kind = match lowered.as_str() {
        "broker" => "brokers".to_string(),
        "customer" => "customers".to_string(),
        "trucker" => "truckers".to_string(),
        "materialsupplier" | "material-supplier" | "material_supplier" => {
            "material-suppliers".to_string()
        }
        "developer" => "developers".to_string(),
        other if other.ends_with('s') => other.to_string(),
        other => format!("{}s", other),
    };
    Ok(ResourceIdentifier::new(kind, id))
}

fn relationship_identifier(spec: &RelationshipSpec, raw: &str) -> Result<ResourceIdentifier> {
    match spec.target {
        RelationshipTarget::Fixed(kind) => Ok(ResourceIdentifier::new(kind, raw.trim())),
        RelationshipTarget::Polymorphic => parse_organization(raw),
    }
}

/// Error for a required flag that was not given.
pub fn required_error(definition: &ResourceDefinition, flag: &str) -> XbeError {
    let polymorphic = definition
        .relationship(flag)
        .is_some_and(|r| r.target == RelationshipTarget::Polymorphic);
    if polymorphic {
        XbeError::validation(format!(
            "--{} is required (format: Type|ID, e.g. Broker|123)",
            flag
        ))
    } else {
        XbeError::validation(format!("--{} is required", flag))
    }
}

/// Build attributes and relationships from flag values.
///
/// On create, blank values are skipped and required flags are enforced.
/// On update, a blank attribute is cleared and a blank relationship is sent
/// as `data: null`.
pub fn build_write_body(
    definition: &ResourceDefinition,
    values: &FieldValues,
    mode: WriteMode,
) -> Result<WriteBody> {
    for (flag, _) in values.iter() {
        if definition.attribute(flag).is_none() && definition.relationship(flag).is_none() {
            return Err(XbeError::validation(format!(
                "unknown flag --{} for {}",
                flag, definition.name
            )));
        }
        if mode == WriteMode::Update && definition.is_create_only(flag) {
            return Err(XbeError::validation(format!(
                "--{} can only be set on create",
                flag
            )));
        }
    }

    if mode == WriteMode::Create {
        if let Some(flag) = definition
            .required_on_create
            .iter()
            .find(|flag| values.text(flag).is_none())
        {
            return Err(required_error(definition, flag));
        }
    }

    let mut body = WriteBody::default();

    for spec in definition.attributes {
        match (values.get(spec.flag), mode) {
            (Some(FieldValue::Set(raw)), _) => {
                body.attributes
                    .insert(spec.attribute.to_string(), attribute_value(spec, raw)?);
            }
            (Some(FieldValue::Empty), WriteMode::Update) => {
                body.attributes
                    .insert(spec.attribute.to_string(), cleared_attribute_value(spec.kind));
            }
            _ => {}
        }
    }

    for spec in definition.relationships {
        match (values.get(spec.flag), mode) {
            (Some(FieldValue::Set(raw)), _) => {
                let identifier = relationship_identifier(spec, raw)?;
                body.relationships.insert(
                    spec.name.to_string(),
                    json!({ "data": { "type": identifier.kind, "id": identifier.id } }),
                );
                body.linked.push((spec.name, identifier));
            }
            (Some(FieldValue::Empty), WriteMode::Update) => {
                body.relationships
                    .insert(spec.name.to_string(), json!({ "data": null }));
            }
            _ => {}
        }
    }

    match mode {
        WriteMode::Create if definition.create_requires_any && body.is_empty() => {
            Err(XbeError::validation("at least one field is required"))
        }
        WriteMode::Update if body.is_empty() => Err(XbeError::validation(
            "no fields to update; specify at least one flag",
        )),
        _ => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::definition::{Action, QueryShape, READ_ONLY};

    const GADGETS: ResourceDefinition = ResourceDefinition {
        name: "gadgets",
        kind: "gadgets",
        singular: "gadget",
        plural: "gadgets",
        about: "Gadgets",
        actions: READ_ONLY,
        list: QueryShape::EMPTY,
        show: QueryShape::EMPTY,
        default_sort: None,
        filters: &[],
        attributes: &[
            AttributeSpec {
                flag: "name",
                attribute: "company-name",
                kind: AttrKind::String,
                help: "Name",
            },
            AttributeSpec {
                flag: "is-active",
                attribute: "is-active",
                kind: AttrKind::Bool,
                help: "Active",
            },
            AttributeSpec {
                flag: "sort-order",
                attribute: "explicit-sort-order",
                kind: AttrKind::Int,
                help: "Order",
            },
            AttributeSpec {
                flag: "start-on",
                attribute: "start-on",
                kind: AttrKind::Date,
                help: "Start",
            },
        ],
        relationships: &[
            RelationshipSpec {
                flag: "owner",
                name: "owner",
                target: RelationshipTarget::Fixed("users"),
                help: "Owner",
            },
            RelationshipSpec {
                flag: "organization",
                name: "organization",
                target: RelationshipTarget::Polymorphic,
                help: "Organization",
            },
        ],
        required_on_create: &["name", "organization"],
        create_only: &["organization"],
        create_requires_any: false,
        polymorphic: false,
    };

    #[test]
    fn test_create_maps_flags_and_skips_blanks() {
        let values = FieldValues::new()
            .with("name", "Acme")
            .with("is-active", "TRUE")
            .with("sort-order", "")
            .with("organization", "Broker|7");

        let body = build_write_body(&GADGETS, &values, WriteMode::Create).unwrap();
        assert_eq!(
            body.document("gadgets", None),
            json!({
                "data": {
                    "type": "gadgets",
                    "attributes": {"company-name": "Acme", "is-active": true},
                    "relationships": {
                        "organization": {"data": {"type": "brokers", "id": "7"}}
                    }
                }
            })
        );
        assert_eq!(body.linked[0].1, ResourceIdentifier::new("brokers", "7"));
    }

    #[test]
    fn test_create_requires_flags() {
        let values = FieldValues::new().with("organization", "Broker|7");
        let err = build_write_body(&GADGETS, &values, WriteMode::Create).unwrap_err();
        assert_eq!(err.to_string(), "--name is required");

        let values = FieldValues::new().with("name", "Acme");
        let err = build_write_body(&GADGETS, &values, WriteMode::Create).unwrap_err();
        assert_eq!(
            err.to_string(),
            "--organization is required (format: Type|ID, e.g. Broker|123)"
        );
    }

    #[test]
    fn test_update_tri_state() {
        let mut values = FieldValues::new();
        values
            .insert("name", FieldValue::Empty)
            .insert("sort-order", FieldValue::Empty)
            .insert("owner", FieldValue::Empty)
            .insert("is-active", FieldValue::Absent);

        let body = build_write_body(&GADGETS, &values, WriteMode::Update).unwrap();
        assert_eq!(
            body.document("gadgets", Some("5")),
            json!({
                "data": {
                    "type": "gadgets",
                    "id": "5",
                    "attributes": {"company-name": "", "explicit-sort-order": null},
                    "relationships": {"owner": {"data": null}}
                }
            })
        );
    }

    #[test]
    fn test_update_rejects_create_only_flags() {
        let values = FieldValues::new().with("organization", "Customer|3");
        let err = build_write_body(&GADGETS, &values, WriteMode::Update).unwrap_err();
        assert_eq!(err.to_string(), "--organization can only be set on create");

        let mut cleared = FieldValues::new();
        cleared.insert("organization", FieldValue::Empty);
        assert!(build_write_body(&GADGETS, &cleared, WriteMode::Update).is_err());

        let flags: Vec<&str> = GADGETS.flags_for(Action::Update).collect();
        assert_eq!(flags, ["name", "is-active", "sort-order", "start-on", "owner"]);
        assert_eq!(GADGETS.flags_for(Action::Create).count(), 6);
    }

    #[test]
    fn test_cleared_bool_is_sent_as_false() {
        let mut values = FieldValues::new();
        values.insert("is-active", FieldValue::Empty);
        let body = build_write_body(&GADGETS, &values, WriteMode::Update).unwrap();
        assert_eq!(body.attributes["is-active"], json!(false));
    }

    #[test]
    fn test_update_with_nothing_is_rejected() {
        let err = build_write_body(&GADGETS, &FieldValues::new(), WriteMode::Update).unwrap_err();
        assert_eq!(err.to_string(), "no fields to update; specify at least one flag");
    }

    #[test]
    fn test_typed_values_are_validated() {
        let values = FieldValues::new().with("is-active", "maybe");
        let err = build_write_body(&GADGETS, &values, WriteMode::Update).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid --is-active \"maybe\" (expected true or false)"
        );

        let values = FieldValues::new().with("start-on", "2025-13-01");
        assert!(build_write_body(&GADGETS, &values, WriteMode::Update).is_err());

        let values = FieldValues::new().with("bogus", "1");
        let err = build_write_body(&GADGETS, &values, WriteMode::Update).unwrap_err();
        assert_eq!(err.to_string(), "unknown flag --bogus for gadgets");
    }

    #[test]
    fn test_parse_organization() {
        assert_eq!(
            parse_organization("Broker|123").unwrap(),
            ResourceIdentifier::new("brokers", "123")
        );
        assert_eq!(
            parse_organization(" MaterialSupplier | 9 ").unwrap(),
            ResourceIdentifier::new("material-suppliers", "9")
        );
        assert_eq!(
            parse_organization("Customers|4").unwrap().kind,
            "customers"
        );
        assert_eq!(parse_organization("Shop|4").unwrap().kind, "shops");

        for bad in ["Broker", "|1", "Broker|", ""] {
            let err = parse_organization(bad).unwrap_err();
            assert!(err.to_string().starts_with("invalid organization format"));
        }
    }

    #[test]
    fn test_attribute_value_kinds() {
        let list = AttributeSpec {
            flag: "tags",
            attribute: "tags",
            kind: AttrKind::List,
            help: "",
        };
        assert_eq!(attribute_value(&list, "a, b,,c").unwrap(), json!(["a", "b", "c"]));

        let json_attr = AttributeSpec {
            flag: "settings",
            attribute: "settings",
            kind: AttrKind::Json,
            help: "",
        };
        assert_eq!(
            attribute_value(&json_attr, r#"{"x": 1}"#).unwrap(),
            json!({"x": 1})
        );
        assert!(attribute_value(&json_attr, "{").is_err());

        let float = AttributeSpec {
            flag: "rate",
            attribute: "rate",
            kind: AttrKind::Float,
            help: "",
        };
        assert_eq!(attribute_value(&float, "2.5").unwrap(), json!(2.5));
        assert!(attribute_value(&float, "NaN").is_err());
    }
}
