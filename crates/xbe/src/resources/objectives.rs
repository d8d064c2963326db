//! Objectives: goals owned by a person and scoped to an organization or project.

use serde::Serialize;

use crate::error::{Result, XbeError};
use crate::jsonapi::attrs::{format_date, opt_bool_attr, trimmed_attr};
use crate::jsonapi::{COMPANY_LABEL, IdentityMap, NAME_LABEL, Related, Resource, resolve_related};
use crate::render::{Details, Table};

use super::definition::{
    AttrKind, FULL_CRUD, FieldSet, QueryShape, ResourceDefinition, polymorphic, same_attribute,
    same_filter, to_one,
};
use super::view::ResourceView;
use super::write::FieldValues;

const RELATED_FIELDS: &[FieldSet] = &[
    FieldSet {
        kind: "users",
        fields: &["name"],
    },
    FieldSet {
        kind: "projects",
        fields: &["name"],
    },
    FieldSet {
        kind: "brokers",
        fields: &["company-name"],
    },
    FieldSet {
        kind: "customers",
        fields: &["company-name"],
    },
    FieldSet {
        kind: "truckers",
        fields: &["company-name"],
    },
    FieldSet {
        kind: "material-suppliers",
        fields: &["name"],
    },
    FieldSet {
        kind: "developers",
        fields: &["name"],
    },
];

pub const OBJECTIVES: ResourceDefinition = ResourceDefinition {
    name: "objectives",
    kind: "objectives",
    singular: "objective",
    plural: "objectives",
    about: "Objectives and objective templates",
    actions: FULL_CRUD,
    list: QueryShape {
        include: &["owner", "organization", "project", "sales-responsible-person"],
        fields: &[
            FieldSet {
                kind: "objectives",
                fields: &[
                    "name",
                    "status",
                    "start-on",
                    "end-on",
                    "commitment",
                    "is-template",
                    "template-scope",
                    "slug",
                    "owner",
                    "organization",
                    "project",
                    "sales-responsible-person",
                ],
            },
            FieldSet {
                kind: "users",
                fields: &["name"],
            },
            FieldSet {
                kind: "projects",
                fields: &["name"],
            },
            FieldSet {
                kind: "brokers",
                fields: &["company-name"],
            },
            FieldSet {
                kind: "customers",
                fields: &["company-name"],
            },
            FieldSet {
                kind: "truckers",
                fields: &["company-name"],
            },
            FieldSet {
                kind: "material-suppliers",
                fields: &["name"],
            },
            FieldSet {
                kind: "developers",
                fields: &["name"],
            },
        ],
    },
    show: QueryShape {
        include: &["owner", "organization", "project", "sales-responsible-person"],
        fields: RELATED_FIELDS,
    },
    default_sort: None,
    filters: &[
        same_filter("name", "Filter by name"),
        same_filter("owner", "Filter by owner user ID"),
        same_filter("organization", "Filter by organization (Type|ID)"),
        same_filter("status", "Filter by status"),
        same_filter("start-on", "Filter by start date (YYYY-MM-DD)"),
        same_filter("start-on-min", "Filter by start date on/after"),
        same_filter("start-on-max", "Filter by start date on/before"),
        same_filter("end-on", "Filter by end date (YYYY-MM-DD)"),
        same_filter("end-on-min", "Filter by end date on/after"),
        same_filter("end-on-max", "Filter by end date on/before"),
        same_filter("commitment", "Filter by commitment"),
        same_filter("project", "Filter by project ID"),
        same_filter("is-template", "Filter by template status (true/false)"),
        same_filter("template-scope", "Filter by template scope"),
        same_filter("slug", "Filter by slug"),
        same_filter("sales-responsible-person", "Filter by sales responsible person user ID"),
    ],
    attributes: &[
        same_attribute("name", AttrKind::String, "Objective name (required)"),
        same_attribute("description", AttrKind::String, "Description"),
        same_attribute("start-on", AttrKind::Date, "Start date (YYYY-MM-DD)"),
        same_attribute("end-on", AttrKind::Date, "End date (YYYY-MM-DD)"),
        same_attribute("commitment", AttrKind::String, "Commitment (committed, aspirational)"),
        same_attribute("name-summary-explicit", AttrKind::String, "Explicit name summary"),
        same_attribute("is-template", AttrKind::Bool, "Mark as template (true/false)"),
        same_attribute(
            "template-scope",
            AttrKind::String,
            "Template scope (match_all, organization, project)",
        ),
        same_attribute(
            "is-generating-objective-stakeholder-classifications",
            AttrKind::Bool,
            "Generate stakeholder classifications (true/false)",
        ),
    ],
    relationships: &[
        to_one("owner", "users", "Owner user ID"),
        polymorphic("organization", "Organization in Type|ID format (e.g. Broker|123)"),
        to_one("project", "projects", "Project ID"),
        to_one("sales-responsible-person", "users", "Sales responsible person user ID"),
    ],
    required_on_create: &["name"],
    create_only: &[],
    create_requires_any: false,
    polymorphic: false,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ObjectiveRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub commitment: String,
    pub start_on: String,
    pub end_on: String,
    pub is_template: Option<bool>,
    pub template_scope: String,
    pub slug: String,
    pub owner_id: String,
    pub owner_name: String,
    pub organization_id: String,
    pub organization_type: String,
    pub organization_name: String,
    pub project_id: String,
    pub project_name: String,
    pub sales_responsible_person_id: String,
    pub sales_responsible_person_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ObjectiveRow {
    /// Organization name, else `type/id`.
    fn organization_display(&self) -> String {
        if !self.organization_name.is_empty() {
            return self.organization_name.clone();
        }
        if self.organization_type.is_empty() || self.organization_id.is_empty() {
            return String::new();
        }
        format!("{}/{}", self.organization_type, self.organization_id)
    }
}

/// `name (id)`, or whichever half is known.
fn name_and_id(name: &str, id: &str) -> String {
    match (name.is_empty(), id.is_empty()) {
        (true, _) => id.to_string(),
        (false, true) => name.to_string(),
        (false, false) => format!("{} ({})", name, id),
    }
}

fn split(related: Related) -> (String, String, String) {
    (related.id, related.kind, related.label)
}

pub struct Objectives;

impl ResourceView for Objectives {
    type Row = ObjectiveRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &OBJECTIVES
    }

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> ObjectiveRow {
        let attrs = &resource.attributes;
        let (owner_id, _, owner_name) =
            split(resolve_related(resource, "owner", included, NAME_LABEL));
        let (organization_id, organization_type, organization_name) =
            split(resolve_related(resource, "organization", included, COMPANY_LABEL));
        let (project_id, _, project_name) =
            split(resolve_related(resource, "project", included, NAME_LABEL));
        let (sales_responsible_person_id, _, sales_responsible_person_name) = split(
            resolve_related(resource, "sales-responsible-person", included, NAME_LABEL),
        );

        ObjectiveRow {
            id: resource.id.clone(),
            name: trimmed_attr(attrs, "name"),
            status: trimmed_attr(attrs, "status"),
            commitment: trimmed_attr(attrs, "commitment"),
            start_on: format_date(&trimmed_attr(attrs, "start-on")),
            end_on: format_date(&trimmed_attr(attrs, "end-on")),
            is_template: opt_bool_attr(attrs, "is-template"),
            template_scope: trimmed_attr(attrs, "template-scope"),
            slug: trimmed_attr(attrs, "slug"),
            owner_id,
            owner_name,
            organization_id,
            organization_type,
            organization_name,
            project_id,
            project_name,
            sales_responsible_person_id,
            sales_responsible_person_name,
            description: trimmed_attr(attrs, "description"),
        }
    }

    fn table(&self, rows: &[ObjectiveRow]) -> Table {
        let mut table = Table::new()
            .column("ID")
            .column("STATUS")
            .truncated("NAME", 40)
            .column("COMMITMENT")
            .column("START")
            .column("END")
            .truncated("OWNER", 25)
            .truncated("ORG", 30)
            .column("TEMPLATE");
        for row in rows {
            let owner = if row.owner_name.is_empty() {
                row.owner_id.clone()
            } else {
                row.owner_name.clone()
            };
            table.add_row([
                row.id.clone(),
                row.status.clone(),
                row.name.clone(),
                row.commitment.clone(),
                row.start_on.clone(),
                row.end_on.clone(),
                owner,
                row.organization_display(),
                row.is_template.map(|t| t.to_string()).unwrap_or_default(),
            ]);
        }
        table
    }

    fn details(&self, row: &ObjectiveRow) -> Details {
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Name", &row.name)
            .field("Status", &row.status)
            .field("Commitment", &row.commitment)
            .field("Start On", &row.start_on)
            .field("End On", &row.end_on)
            .field("Description", &row.description)
            .field("Slug", &row.slug)
            .flag("Is Template", row.is_template)
            .field("Template Scope", &row.template_scope)
            .section("Relationships")
            .field("Owner", name_and_id(&row.owner_name, &row.owner_id))
            .field("Organization", row.organization_display())
            .field("Project", name_and_id(&row.project_name, &row.project_id))
            .field(
                "Sales Responsible Person",
                name_and_id(
                    &row.sales_responsible_person_name,
                    &row.sales_responsible_person_id,
                ),
            );
        details
    }

    fn label(&self, row: &ObjectiveRow) -> String {
        row.name.clone()
    }

    /// Templates carry a scope and no owning organization or people;
    /// everything else needs an organization.
    fn validate_create(&self, values: &FieldValues) -> Result<()> {
        let is_template = values
            .text("is-template")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let has = |flag: &str| values.text(flag).is_some();

        if is_template {
            if !has("template-scope") {
                return Err(XbeError::validation(
                    "--template-scope is required when --is-template true",
                ));
            }
            for flag in ["organization", "owner", "sales-responsible-person"] {
                if has(flag) {
                    return Err(XbeError::validation(format!(
                        "--{} cannot be used when --is-template true",
                        flag
                    )));
                }
            }
            return Ok(());
        }

        if has("template-scope") {
            return Err(XbeError::validation(
                "--template-scope requires --is-template true",
            ));
        }
        if !has("organization") {
            return Err(XbeError::validation(
                "--organization is required for non-template objectives (or set --is-template true)",
            ));
        }
        Ok(())
    }
}
