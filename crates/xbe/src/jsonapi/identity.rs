//! Lookup of included resources by `(type, id)`.

use std::collections::HashMap;

use super::document::{Resource, ResourceIdentifier};

/// Composite lookup key for a resource.
pub fn resource_key(kind: &str, id: &str) -> (String, String) {
    (kind.to_string(), id.to_string())
}

/// Included resources indexed by [`resource_key`].
#[derive(Debug, Default)]
pub struct IdentityMap<'a> {
    resources: HashMap<(String, String), &'a Resource>,
}

impl<'a> IdentityMap<'a> {
    pub fn new(included: &'a [Resource]) -> Self {
        let resources = included
            .iter()
            .map(|r| (resource_key(&r.kind, &r.id), r))
            .collect();
        Self { resources }
    }

    pub fn get(&self, kind: &str, id: &str) -> Option<&'a Resource> {
        self.resources.get(&resource_key(kind, id)).copied()
    }

    pub fn resolve(&self, identifier: &ResourceIdentifier) -> Option<&'a Resource> {
        self.get(&identifier.kind, &identifier.id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(kind: &str, id: &str) -> Resource {
        Resource {
            kind: kind.to_string(),
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_requires_exact_type_and_id() {
        let included = vec![resource("brokers", "1"), resource("customers", "1")];
        let map = IdentityMap::new(&included);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("brokers", "1").unwrap().kind, "brokers");
        assert_eq!(map.get("customers", "1").unwrap().kind, "customers");
        assert!(map.get("truckers", "1").is_none());
        assert!(map.get("brokers", "10").is_none());
        assert!(
            map.resolve(&ResourceIdentifier::new("customers", "1"))
                .is_some()
        );
    }

    #[test]
    fn test_separator_characters_do_not_collide() {
        assert_ne!(resource_key("a|b", "c"), resource_key("a", "b|c"));

        let included = vec![resource("a|b", "c"), resource("a", "b|c")];
        let map = IdentityMap::new(&included);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a|b", "c").unwrap().id, "c");
        assert_eq!(map.get("a", "b|c").unwrap().id, "b|c");
        assert!(map.get("a", "b").is_none());
        assert!(IdentityMap::new(&[]).is_empty());
    }
}
