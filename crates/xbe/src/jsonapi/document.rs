//! JSON:API document types and decoding.

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, XbeError};

use super::identity::IdentityMap;

/// `{type, id}` reference to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Relationship linkage: one identifier or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceIdentifier>),
    One(ResourceIdentifier),
}

/// Relationship object. `data` is `None` when null or omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

/// A typed, identified record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: IndexMap<String, Relationship>,
}

/// Primary data: a single resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<Resource>),
    One(Box<Resource>),
}

/// A JSON:API response document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub data: Option<PrimaryData>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub included: Vec<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    /// Decode a response body.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| XbeError::Decode(e.to_string()))
    }

    /// Primary resources of a collection response. A null `data` is empty.
    pub fn list(&self) -> Result<&[Resource]> {
        match &self.data {
            Some(PrimaryData::Many(resources)) => Ok(resources),
            None => Ok(&[]),
            Some(PrimaryData::One(_)) => Err(XbeError::Decode(
                "expected a resource collection, got a single resource".to_string(),
            )),
        }
    }

    /// Primary resource of a single-resource response.
    pub fn single(&self) -> Result<&Resource> {
        match &self.data {
            Some(PrimaryData::One(resource)) => Ok(resource),
            Some(PrimaryData::Many(_)) => Err(XbeError::Decode(
                "expected a single resource, got a collection".to_string(),
            )),
            None => Err(XbeError::Decode("response has no data".to_string())),
        }
    }

    /// Lookup over the `included` resources.
    pub fn identity_map(&self) -> IdentityMap<'_> {
        IdentityMap::new(&self.included)
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("invalid resource id: {}", other))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collection_with_included() {
        let body = r#"{
            "data": [
                {"type": "broker-commitments", "id": "1",
                 "attributes": {"status": "active"},
                 "relationships": {
                    "buyer": {"data": {"type": "brokers", "id": "7"}},
                    "truck-scope": {"data": null},
                    "tags": {"data": [{"type": "tags", "id": 3}]}
                 }}
            ],
            "included": [
                {"type": "brokers", "id": "7", "attributes": {"company-name": "Acme"}}
            ]
        }"#;

        let doc = Document::parse(body).unwrap();
        let resources = doc.list().unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].kind, "broker-commitments");
        assert_eq!(resources[0].attributes["status"], "active");

        let rels = &resources[0].relationships;
        assert_eq!(
            rels["buyer"].data,
            Some(Linkage::One(ResourceIdentifier::new("brokers", "7")))
        );
        assert_eq!(rels["truck-scope"].data, None);
        assert_eq!(
            rels["tags"].data,
            Some(Linkage::Many(vec![ResourceIdentifier::new("tags", "3")]))
        );
        assert_eq!(doc.included.len(), 1);
    }

    #[test]
    fn test_parse_single_and_shape_mismatch() {
        let doc = Document::parse(r#"{"data": {"type": "brokers", "id": "1"}}"#).unwrap();
        assert_eq!(doc.single().unwrap().id, "1");
        assert!(doc.list().is_err());
        assert!(doc.included.is_empty());

        let doc = Document::parse(r#"{"data": []}"#).unwrap();
        assert!(doc.single().is_err());
        assert!(doc.list().unwrap().is_empty());
    }

    #[test]
    fn test_null_members_default() {
        let doc = Document::parse(
            r#"{"data": [{"type": "brokers", "id": "1", "attributes": null, "relationships": null}], "included": null}"#,
        )
        .unwrap();
        let resource = &doc.list().unwrap()[0];
        assert!(resource.attributes.is_empty());
        assert!(resource.relationships.is_empty());

        let empty = Document::parse(r#"{"data": null}"#).unwrap();
        assert!(empty.list().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = Document::parse("<html>oops</html>").unwrap_err();
        assert!(matches!(err, XbeError::Decode(_)));
    }
}
