//! Projects: customer jobs run by a developer.

use serde::Serialize;

use crate::jsonapi::attrs::{format_date, opt_bool_attr, trimmed_attr};
use crate::jsonapi::{COMPANY_LABEL, IdentityMap, NAME_LABEL, Resource, resolve_related};
use crate::render::{Details, Table};

use super::definition::{
    AttrKind, FULL_CRUD, FieldSet, QueryShape, ResourceDefinition, attribute, filter,
    same_attribute, same_filter, to_one,
};
use super::view::ResourceView;

const NAME_MAX: usize = 50;
const STATUS_MAX: usize = 20;

pub const PROJECTS: ResourceDefinition = ResourceDefinition {
    name: "projects",
    kind: "projects",
    singular: "project",
    plural: "projects",
    about: "Projects and opportunities",
    actions: FULL_CRUD,
    list: QueryShape {
        include: &[],
        fields: &[FieldSet {
            kind: "projects",
            fields: &["name", "status", "created-at"],
        }],
    },
    show: QueryShape {
        include: &["developer", "project-manager", "estimator", "project-office"],
        fields: &[
            FieldSet {
                kind: "developers",
                fields: &["name"],
            },
            FieldSet {
                kind: "users",
                fields: &["name"],
            },
            FieldSet {
                kind: "project-offices",
                fields: &["name"],
            },
        ],
    },
    default_sort: None,
    filters: &[
        same_filter("name", "Filter by project name (partial match)"),
        same_filter("status", "Filter by project status"),
        filter("created-at-min", "created_at_min", "Filter by minimum created date (YYYY-MM-DD)"),
        filter("created-at-max", "created_at_max", "Filter by maximum created date (YYYY-MM-DD)"),
        same_filter("broker", "Filter by broker ID (comma-separated for multiple)"),
        same_filter("customer", "Filter by customer ID (comma-separated for multiple)"),
        same_filter("project-manager", "Filter by project manager user ID"),
        same_filter("estimator", "Filter by estimator user ID"),
        same_filter("developer", "Filter by developer ID"),
        same_filter("project-office", "Filter by project office ID"),
        same_filter("q", "Full-text search"),
        same_filter("number", "Filter by project number"),
        same_filter("is-active", "Filter by active status (true/false)"),
        same_filter("is-managed", "Filter by managed status (true/false)"),
        same_filter("job-start-on", "Filter by job start date (YYYY-MM-DD)"),
        same_filter("job-start-on-min", "Filter by minimum job start date (YYYY-MM-DD)"),
        same_filter("job-start-on-max", "Filter by maximum job start date (YYYY-MM-DD)"),
        same_filter("due-on", "Filter by due date (YYYY-MM-DD)"),
        same_filter("due-on-min", "Filter by minimum due date (YYYY-MM-DD)"),
        same_filter("due-on-max", "Filter by maximum due date (YYYY-MM-DD)"),
        same_filter("name-like", "Filter by name (partial match)"),
        same_filter(
            "has-material-transaction-orders",
            "Filter by having material transaction orders (true/false)",
        ),
        same_filter("is-project-manager", "Filter by having a project manager (true/false)"),
        same_filter("project-transport-plan", "Filter by project transport plan ID"),
        same_filter("is-transport-only", "Filter by transport only status (true/false)"),
        same_filter("job-production-plan-planner", "Filter by job production plan planner ID"),
    ],
    attributes: &[
        same_attribute("name", AttrKind::String, "Project name (required)"),
        same_attribute("number", AttrKind::String, "Project number"),
        same_attribute("due-on", AttrKind::Date, "Due date (YYYY-MM-DD)"),
        same_attribute("start-on", AttrKind::Date, "Start date (YYYY-MM-DD)"),
        same_attribute("is-opportunity", AttrKind::Bool, "Mark as opportunity (true/false)"),
        attribute(
            "is-inactive",
            "is-inactive-explicit",
            AttrKind::Bool,
            "Mark as inactive (true/false)",
        ),
        same_attribute("is-managed", AttrKind::Bool, "Mark as managed (true/false)"),
        same_attribute(
            "is-prevailing-wage-explicit",
            AttrKind::Bool,
            "Prevailing wage (true/false)",
        ),
        same_attribute(
            "is-certification-required-explicit",
            AttrKind::Bool,
            "Certification required (true/false)",
        ),
        same_attribute(
            "is-time-card-payroll-certification-required-explicit",
            AttrKind::Bool,
            "Time card payroll certification required (true/false)",
        ),
        same_attribute("is-one-way-job-explicit", AttrKind::Bool, "One-way job (true/false)"),
        same_attribute("is-transport-only", AttrKind::Bool, "Transport only (true/false)"),
        same_attribute(
            "enforce-number-uniqueness",
            AttrKind::Bool,
            "Enforce number uniqueness (true/false)",
        ),
    ],
    relationships: &[
        to_one("developer", "developers", "Developer ID (required)"),
        to_one("project-manager", "users", "Project manager user ID"),
        to_one("estimator", "users", "Estimator user ID"),
        to_one("project-office", "project-offices", "Project office ID"),
    ],
    required_on_create: &["name", "developer"],
    create_only: &[],
    create_requires_any: false,
    polymorphic: false,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub number: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_on: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub due_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_opportunity: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_managed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_transport_only: Option<bool>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub developer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_manager: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub estimator: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_office: String,
}

pub struct Projects;

impl ResourceView for Projects {
    type Row = ProjectRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &PROJECTS
    }

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> ProjectRow {
        let attrs = &resource.attributes;
        let related = |name: &str, labels: &[&str]| {
            resolve_related(resource, name, included, labels)
                .display()
                .to_string()
        };
        ProjectRow {
            id: resource.id.clone(),
            name: trimmed_attr(attrs, "name"),
            status: trimmed_attr(attrs, "status"),
            created_at: trimmed_attr(attrs, "created-at"),
            number: trimmed_attr(attrs, "number"),
            start_on: trimmed_attr(attrs, "start-on"),
            due_on: trimmed_attr(attrs, "due-on"),
            is_opportunity: opt_bool_attr(attrs, "is-opportunity"),
            is_managed: opt_bool_attr(attrs, "is-managed"),
            is_transport_only: opt_bool_attr(attrs, "is-transport-only"),
            developer: related("developer", COMPANY_LABEL),
            project_manager: related("project-manager", NAME_LABEL),
            estimator: related("estimator", NAME_LABEL),
            project_office: related("project-office", NAME_LABEL),
        }
    }

    fn table(&self, rows: &[ProjectRow]) -> Table {
        let mut table = Table::new()
            .column("ID")
            .truncated("NAME", NAME_MAX)
            .truncated("STATUS", STATUS_MAX)
            .column("CREATED");
        for row in rows {
            table.add_row([
                row.id.clone(),
                row.name.clone(),
                row.status.clone(),
                format_date(&row.created_at),
            ]);
        }
        table
    }

    fn details(&self, row: &ProjectRow) -> Details {
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Name", &row.name)
            .field("Number", &row.number)
            .field("Status", &row.status)
            .field("Start On", format_date(&row.start_on))
            .field("Due On", format_date(&row.due_on))
            .field("Created", format_date(&row.created_at))
            .flag("Opportunity", row.is_opportunity)
            .flag("Managed", row.is_managed)
            .flag("Transport Only", row.is_transport_only)
            .section("People")
            .field("Developer", &row.developer)
            .field("Project Manager", &row.project_manager)
            .field("Estimator", &row.estimator)
            .field("Project Office", &row.project_office);
        details
    }

    fn label(&self, row: &ProjectRow) -> String {
        row.name.clone()
    }
}
