//! Relationship extraction and resolution through the identity map.

use serde::Serialize;

use super::attrs::first_non_empty;
use super::document::{Linkage, Resource, ResourceIdentifier};
use super::identity::IdentityMap;

/// Label attributes for organizations (brokers, customers, truckers, ...).
pub const COMPANY_LABEL: &[&str] = &["company-name", "name"];

/// Label attributes for resources with a plain `name`.
pub const NAME_LABEL: &[&str] = &["name"];

/// Label attributes for resources titled rather than named.
pub const TITLE_LABEL: &[&str] = &["name", "title"];

impl Resource {
    /// Single identifier of relationship `name`, if present and non-null.
    pub fn related_identifier(&self, name: &str) -> Option<&ResourceIdentifier> {
        match self.relationships.get(name)?.data.as_ref()? {
            Linkage::One(identifier) => Some(identifier),
            Linkage::Many(_) => None,
        }
    }

    /// ID of single relationship `name`, empty when absent or null.
    pub fn related_id(&self, name: &str) -> String {
        self.related_identifier(name)
            .map(|i| i.id.clone())
            .unwrap_or_default()
    }

    /// IDs of relationship `name`; a to-one relationship yields one ID.
    pub fn related_ids(&self, name: &str) -> Vec<String> {
        match self.relationships.get(name).and_then(|r| r.data.as_ref()) {
            Some(Linkage::Many(ids)) => ids.iter().map(|i| i.id.clone()).collect(),
            Some(Linkage::One(identifier)) => vec![identifier.id.clone()],
            None => Vec::new(),
        }
    }
}

/// First non-empty label attribute of a resource.
pub fn label_of(resource: &Resource, label_attrs: &[&str]) -> String {
    first_non_empty(
        label_attrs
            .iter()
            .map(|key| super::attrs::string_attr(&resource.attributes, key)),
    )
}

/// A related resource as shown in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Related {
    pub id: String,
    pub kind: String,
    /// Display label pulled from `included`; empty when not included.
    pub label: String,
}

impl Related {
    /// Label, or the bare identifier when the label is unknown.
    pub fn display(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// Resolve to-one relationship `name` of `resource`.
///
/// A missing relationship or `data: null` yields an empty [`Related`]. A
/// relationship whose target is not in `included` keeps its ID with an empty
/// label.
pub fn resolve_related(
    resource: &Resource,
    name: &str,
    included: &IdentityMap<'_>,
    label_attrs: &[&str],
) -> Related {
    let Some(identifier) = resource.related_identifier(name) else {
        return Related::default();
    };

    let label = included
        .resolve(identifier)
        .map(|target| label_of(target, label_attrs))
        .unwrap_or_default();

    Related {
        id: identifier.id.clone(),
        kind: identifier.kind.clone(),
        label,
    }
}

/// Like [`resolve_related`], but only when the target is of type `kind`.
pub fn resolve_related_of_kind(
    resource: &Resource,
    name: &str,
    kind: &str,
    included: &IdentityMap<'_>,
    label_attrs: &[&str],
) -> Option<Related> {
    let identifier = resource.related_identifier(name)?;
    if identifier.kind != kind {
        return None;
    }
    Some(resolve_related(resource, name, included, label_attrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::Document;

    fn doc() -> Document {
        Document::parse(
            r#"{
                "data": [{
                    "type": "memberships", "id": "5",
                    "relationships": {
                        "user": {"data": {"type": "users", "id": "9"}},
                        "organization": {"data": {"type": "brokers", "id": "2"}},
                        "broker": {"data": {"type": "brokers", "id": "404"}},
                        "project-office": {"data": null},
                        "tags": {"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]}
                    }
                }],
                "included": [
                    {"type": "users", "id": "9", "attributes": {"name": "Dana"}},
                    {"type": "brokers", "id": "2", "attributes": {"company-name": "", "name": "Acme Hauling"}}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_resolves_label_in_priority_order() {
        let doc = doc();
        let map = doc.identity_map();
        let membership = &doc.list().unwrap()[0];

        let org = resolve_related(membership, "organization", &map, COMPANY_LABEL);
        assert_eq!(org.id, "2");
        assert_eq!(org.kind, "brokers");
        assert_eq!(org.label, "Acme Hauling");

        let user = resolve_related(membership, "user", &map, NAME_LABEL);
        assert_eq!(user.display(), "Dana");
    }

    #[test]
    fn test_null_relationship_is_empty_not_error() {
        let doc = doc();
        let map = doc.identity_map();
        let membership = &doc.list().unwrap()[0];

        let office = resolve_related(membership, "project-office", &map, NAME_LABEL);
        assert!(office.is_empty());
        assert_eq!(office.display(), "");

        let missing = resolve_related(membership, "nonexistent", &map, NAME_LABEL);
        assert_eq!(missing, Related::default());
    }

    #[test]
    fn test_not_included_falls_back_to_identifier() {
        let doc = doc();
        let map = doc.identity_map();
        let membership = &doc.list().unwrap()[0];

        let broker = resolve_related(membership, "broker", &map, COMPANY_LABEL);
        assert_eq!(broker.label, "");
        assert_eq!(broker.display(), "404");
    }

    #[test]
    fn test_related_ids_and_kind_filter() {
        let doc = doc();
        let map = doc.identity_map();
        let membership = &doc.list().unwrap()[0];

        assert_eq!(membership.related_ids("tags"), vec!["1", "2"]);
        assert_eq!(membership.related_ids("user"), vec!["9"]);
        assert!(membership.related_ids("project-office").is_empty());
        assert_eq!(membership.related_id("tags"), "");

        assert!(
            resolve_related_of_kind(membership, "organization", "customers", &map, COMPANY_LABEL)
                .is_none()
        );
        assert!(
            resolve_related_of_kind(membership, "organization", "brokers", &map, COMPANY_LABEL)
                .is_some()
        );
    }
}
