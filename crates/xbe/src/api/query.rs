//! Query-string parameters for JSON:API requests.

use indexmap::IndexMap;

/// Ordered query parameters. Setting a key twice replaces the first value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: IndexMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Set `key` only when `value` is non-blank (trimmed).
    pub fn set_if_present(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        let value = value.trim();
        if !value.is_empty() {
            self.params.insert(key.into(), value.to_string());
        }
        self
    }

    /// Set `filter[name]` when `value` is non-blank.
    pub fn filter(&mut self, name: &str, value: &str) -> &mut Self {
        self.set_if_present(format!("filter[{}]", name), value)
    }

    /// Set `fields[kind]` to a comma-joined field list.
    pub fn fields(&mut self, kind: &str, fields: &[&str]) -> &mut Self {
        if !fields.is_empty() {
            self.set(format!("fields[{}]", kind), fields.join(","));
        }
        self
    }

    /// Set `include` to a comma-joined relationship list.
    pub fn include(&mut self, relationships: &[&str]) -> &mut Self {
        if !relationships.is_empty() {
            self.set("include", relationships.join(","));
        }
        self
    }

    /// Set `page[limit]` / `page[offset]`; zero values are omitted.
    pub fn page(&mut self, limit: u32, offset: u32) -> &mut Self {
        if limit > 0 {
            self.set("page[limit]", limit.to_string());
        }
        if offset > 0 {
            self.set("page[offset]", offset.to_string());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Parameters in insertion order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
