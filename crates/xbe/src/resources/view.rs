//! Per-resource row building and rendering.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::jsonapi::{IdentityMap, Resource, ResourceIdentifier};
use crate::render::{Details, Table};

use super::definition::ResourceDefinition;
use super::write::FieldValues;

/// How one resource type is projected into rows and shown.
///
/// Implement this for each resource; [`ResourceHandler`] is derived from it
/// so commands can work over a registry of trait objects.
pub trait ResourceView {
    /// Flat, serializable projection of one record.
    type Row: Serialize;

    fn definition(&self) -> &'static ResourceDefinition;

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> Self::Row;

    /// List table with this resource's columns.
    fn table(&self, rows: &[Self::Row]) -> Table;

    /// `show` detail view.
    fn details(&self, row: &Self::Row) -> Details;

    /// Short human label used in `Created ...`/`Deleted ...` lines.
    fn label(&self, row: &Self::Row) -> String;

    /// Cross-field checks on create, run before any request.
    fn validate_create(&self, _values: &FieldValues) -> Result<()> {
        Ok(())
    }

    /// JSON:API type posted on create.
    fn create_kind(&self, _relationships: &[(&str, ResourceIdentifier)]) -> String {
        ResourceView::definition(self).kind.to_string()
    }
}

/// Object-safe view over any [`ResourceView`].
pub trait ResourceHandler {
    fn definition(&self) -> &'static ResourceDefinition;
    fn row_json(&self, resource: &Resource, included: &IdentityMap<'_>) -> Result<Value>;
    fn rows_json(&self, resources: &[Resource], included: &IdentityMap<'_>) -> Result<Value>;
    fn list_table(&self, resources: &[Resource], included: &IdentityMap<'_>) -> Table;
    fn details(&self, resource: &Resource, included: &IdentityMap<'_>) -> Details;
    fn label(&self, resource: &Resource, included: &IdentityMap<'_>) -> String;
    fn validate_create(&self, values: &FieldValues) -> Result<()>;
    fn create_kind(&self, relationships: &[(&str, ResourceIdentifier)]) -> String;
}

impl<V: ResourceView> ResourceHandler for V {
    fn definition(&self) -> &'static ResourceDefinition {
        ResourceView::definition(self)
    }

    fn row_json(&self, resource: &Resource, included: &IdentityMap<'_>) -> Result<Value> {
        Ok(serde_json::to_value(self.build_row(resource, included))?)
    }

    fn rows_json(&self, resources: &[Resource], included: &IdentityMap<'_>) -> Result<Value> {
        let rows: Vec<V::Row> = resources
            .iter()
            .map(|r| self.build_row(r, included))
            .collect();
        Ok(serde_json::to_value(rows)?)
    }

    fn list_table(&self, resources: &[Resource], included: &IdentityMap<'_>) -> Table {
        let rows: Vec<V::Row> = resources
            .iter()
            .map(|r| self.build_row(r, included))
            .collect();
        self.table(&rows)
    }

    fn details(&self, resource: &Resource, included: &IdentityMap<'_>) -> Details {
        ResourceView::details(self, &self.build_row(resource, included))
    }

    fn label(&self, resource: &Resource, included: &IdentityMap<'_>) -> String {
        ResourceView::label(self, &self.build_row(resource, included))
    }

    fn validate_create(&self, values: &FieldValues) -> Result<()> {
        ResourceView::validate_create(self, values)
    }

    fn create_kind(&self, relationships: &[(&str, ResourceIdentifier)]) -> String {
        ResourceView::create_kind(self, relationships)
    }
}
