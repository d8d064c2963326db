//! Memberships: a user's role within an organization.
//!
//! Memberships are polymorphic. The collection is read at `/v1/memberships`,
//! but records are written under a per-organization endpoint such
//! as `/v1/broker-memberships`.

use serde::Serialize;

use crate::jsonapi::attrs::{format_date, number_attr, opt_bool_attr, trimmed_attr};
use crate::jsonapi::{
    COMPANY_LABEL, IdentityMap, NAME_LABEL, Resource, ResourceIdentifier, resolve_related,
};
use crate::render::{Details, Table};

use super::definition::{
    AttrKind, FULL_CRUD, FieldSet, QueryShape, ResourceDefinition, filter, polymorphic,
    same_attribute, same_filter, to_one,
};
use super::view::ResourceView;

const USER_MAX: usize = 20;
const ORGANIZATION_MAX: usize = 25;

/// Boolean permission and notification attributes, with their labels.
const PERMISSIONS: &[(&str, &str)] = &[
    ("can-see-rates-as-driver", "Can See Rates As Driver"),
    ("can-see-rates-as-manager", "Can See Rates As Manager"),
    (
        "can-validate-profit-improvements",
        "Can Validate Profit Improvements",
    ),
    ("is-rate-editor", "Is Rate Editor"),
    ("is-time-card-auditor", "Is Time Card Auditor"),
    (
        "is-equipment-rental-team-member",
        "Is Equipment Rental Team Member",
    ),
    (
        "is-geofence-violation-team-member",
        "Is Geofence Violation Team Member",
    ),
    (
        "is-unapproved-time-card-subscriber",
        "Unapproved Time Card Subscriber",
    ),
    (
        "is-default-job-production-plan-subscriber",
        "Default Job Production Plan Subscriber",
    ),
    ("enable-recap-notifications", "Recap Notifications"),
    (
        "enable-inventory-capacity-notifications",
        "Inventory Capacity Notifications",
    ),
];

const ORGANIZATION_FIELDS: &[FieldSet] = &[
    FieldSet {
        kind: "users",
        fields: &["name", "email-address", "mobile-number"],
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
    FieldSet {
        kind: "project-offices",
        fields: &["name"],
    },
];

pub const MEMBERSHIPS: ResourceDefinition = ResourceDefinition {
    name: "memberships",
    kind: "memberships",
    singular: "membership",
    plural: "memberships",
    about: "User memberships in brokers, customers, truckers and other organizations",
    actions: FULL_CRUD,
    list: QueryShape {
        include: &["user", "organization", "broker"],
        fields: ORGANIZATION_FIELDS,
    },
    show: QueryShape {
        include: &["user", "organization", "broker", "project-office"],
        fields: ORGANIZATION_FIELDS,
    },
    default_sort: None,
    filters: &[
        same_filter("broker", "Filter by broker ID"),
        same_filter("user", "Filter by user ID"),
        same_filter("organization", "Filter by organization (Type|ID)"),
        filter("project-office", "project_office", "Filter by project office ID"),
        same_filter("kind", "Filter by kind (operations, manager)"),
        filter("q", "q", "Search by user name or email"),
        filter("drives-shift-type", "drives_shift_type", "Filter by shift type (any, day, night)"),
        filter(
            "external-employee-id",
            "external_employee_id",
            "Filter by external employee ID",
        ),
        filter("is-rate-editor", "is_rate_editor", "Filter by rate editor (true/false)"),
        filter(
            "is-time-card-auditor",
            "is_time_card_auditor",
            "Filter by time card auditor (true/false)",
        ),
        filter(
            "is-equipment-rental-team-member",
            "is_equipment_rental_team_member",
            "Filter by equipment rental team member (true/false)",
        ),
        filter(
            "is-geofence-violation-team-member",
            "is_geofence_violation_team_member",
            "Filter by geofence violation team member (true/false)",
        ),
        filter(
            "is-unapproved-time-card-subscriber",
            "is_unapproved_time_card_subscriber",
            "Filter by unapproved time card subscriber (true/false)",
        ),
        filter(
            "is-default-job-production-plan-subscriber",
            "is_default_job_production_plan_subscriber",
            "Filter by default job production plan subscriber (true/false)",
        ),
    ],
    attributes: &[
        same_attribute("kind", AttrKind::String, "Role: operations or manager"),
        same_attribute("is-admin", AttrKind::Bool, "Admin status (true/false)"),
        same_attribute("title", AttrKind::String, "Title within the organization"),
        same_attribute("color-hex", AttrKind::String, "Display color (e.g. #FF0000)"),
        same_attribute(
            "external-employee-id",
            AttrKind::String,
            "External system employee ID",
        ),
        same_attribute("explicit-sort-order", AttrKind::Int, "Manual sort order"),
        same_attribute("start-at", AttrKind::String, "Membership start (ISO 8601)"),
        same_attribute("end-at", AttrKind::String, "Membership end (ISO 8601)"),
        same_attribute(
            "drives-shift-type",
            AttrKind::String,
            "Shift type: any, day, or night",
        ),
        same_attribute(
            "can-see-rates-as-driver",
            AttrKind::Bool,
            "Can see rates as driver (true/false)",
        ),
        same_attribute(
            "can-see-rates-as-manager",
            AttrKind::Bool,
            "Can see rates as manager (true/false)",
        ),
        same_attribute(
            "can-validate-profit-improvements",
            AttrKind::Bool,
            "Can validate profit improvements (true/false)",
        ),
        same_attribute("is-rate-editor", AttrKind::Bool, "Is rate editor (true/false)"),
        same_attribute(
            "is-time-card-auditor",
            AttrKind::Bool,
            "Is time card auditor (true/false)",
        ),
        same_attribute(
            "is-equipment-rental-team-member",
            AttrKind::Bool,
            "Is equipment rental team member (true/false)",
        ),
        same_attribute(
            "is-geofence-violation-team-member",
            AttrKind::Bool,
            "Is geofence violation team member (true/false)",
        ),
        same_attribute(
            "is-unapproved-time-card-subscriber",
            AttrKind::Bool,
            "Is unapproved time card subscriber (true/false)",
        ),
        same_attribute(
            "is-default-job-production-plan-subscriber",
            AttrKind::Bool,
            "Is default job production plan subscriber (true/false)",
        ),
        same_attribute(
            "enable-recap-notifications",
            AttrKind::Bool,
            "Enable recap notifications (true/false)",
        ),
        same_attribute(
            "enable-inventory-capacity-notifications",
            AttrKind::Bool,
            "Enable inventory capacity notifications (true/false)",
        ),
    ],
    relationships: &[
        to_one("user", "users", "User ID (required on create)"),
        polymorphic(
            "organization",
            "Organization in Type|ID format, e.g. Broker|123 (required on create)",
        ),
        to_one("project-office", "project-offices", "Project office ID"),
    ],
    required_on_create: &["user", "organization"],
    create_only: &["user", "organization"],
    create_requires_any: false,
    polymorphic: true,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct MembershipRow {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub membership_type: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user_mobile: String,
    pub organization_type: String,
    pub organization_id: String,
    pub organization_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub broker_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub broker_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_office_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_office_name: String,
    pub kind: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub external_employee_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_sort_order: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub drives_shift_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub end_at: String,
    /// Permission flags present on the record, keyed by attribute name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<(String, bool)>,
}

/// `brokers` -> `Broker`.
fn organization_label(kind: &str) -> String {
    let singular = kind.strip_suffix('s').unwrap_or(kind);
    let mut chars = singular.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Membership type for an organization type, e.g. `brokers` -> `broker-memberships`.
pub fn membership_kind(organization_kind: &str) -> String {
    let singular = organization_kind
        .strip_suffix('s')
        .unwrap_or(organization_kind);
    format!("{}-memberships", singular)
}

pub struct Memberships;

impl ResourceView for Memberships {
    type Row = MembershipRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &MEMBERSHIPS
    }

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> MembershipRow {
        let attrs = &resource.attributes;
        let user = resolve_related(resource, "user", included, NAME_LABEL);
        let user_attrs = resource
            .related_identifier("user")
            .and_then(|identifier| included.resolve(identifier))
            .map(|user| &user.attributes);
        let contact = |key: &str| user_attrs.map(|a| trimmed_attr(a, key)).unwrap_or_default();
        let organization = resolve_related(resource, "organization", included, COMPANY_LABEL);
        let broker = resolve_related(resource, "broker", included, COMPANY_LABEL);
        let project_office = resolve_related(resource, "project-office", included, NAME_LABEL);

        let permissions = PERMISSIONS
            .iter()
            .filter_map(|(key, _)| opt_bool_attr(attrs, key).map(|v| (key.to_string(), v)))
            .collect();

        MembershipRow {
            id: resource.id.clone(),
            membership_type: resource.kind.clone(),
            user_id: user.id,
            user_name: user.label,
            user_email: contact("email-address"),
            user_mobile: contact("mobile-number"),
            organization_type: organization.kind,
            organization_id: organization.id,
            organization_name: organization.label,
            broker_id: broker.id,
            broker_name: broker.label,
            project_office_id: project_office.id,
            project_office_name: project_office.label,
            kind: trimmed_attr(attrs, "kind"),
            is_admin: opt_bool_attr(attrs, "is-admin").unwrap_or(false),
            title: trimmed_attr(attrs, "title"),
            external_employee_id: trimmed_attr(attrs, "external-employee-id"),
            color_hex: trimmed_attr(attrs, "color-hex"),
            explicit_sort_order: number_attr(attrs, "explicit-sort-order").map(|v| v as i64),
            drives_shift_type: trimmed_attr(attrs, "drives-shift-type"),
            start_at: trimmed_attr(attrs, "start-at"),
            end_at: trimmed_attr(attrs, "end-at"),
            permissions,
        }
    }

    fn table(&self, rows: &[MembershipRow]) -> Table {
        let mut table = Table::new()
            .column("ID")
            .truncated("USER", USER_MAX)
            .column("TYPE")
            .truncated("NAME", ORGANIZATION_MAX)
            .column("KIND");
        let or_id = |name: &str, id: &str| {
            if name.is_empty() {
                id.to_string()
            } else {
                name.to_string()
            }
        };
        for row in rows {
            table.add_row([
                row.id.clone(),
                or_id(&row.user_name, &row.user_id),
                organization_label(&row.organization_type),
                or_id(&row.organization_name, &row.organization_id),
                row.kind.clone(),
            ]);
        }
        table
    }

    fn details(&self, row: &MembershipRow) -> Details {
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Type", &row.membership_type)
            .section("User")
            .field("ID", &row.user_id)
            .field("Name", &row.user_name)
            .field("Email", &row.user_email)
            .field("Mobile", &row.user_mobile)
            .section("Organization")
            .field("Type", &row.organization_type)
            .field("ID", &row.organization_id)
            .field("Name", &row.organization_name)
            .section("Broker")
            .field("ID", &row.broker_id)
            .field("Name", &row.broker_name)
            .section("Project Office")
            .field("ID", &row.project_office_id)
            .field("Name", &row.project_office_name)
            .section("Role")
            .field("Kind", &row.kind)
            .flag("Is Admin", Some(row.is_admin))
            .field("Title", &row.title)
            .field("Color", &row.color_hex)
            .field("External Employee ID", &row.external_employee_id)
            .field(
                "Explicit Sort Order",
                row.explicit_sort_order
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            )
            .field("Drives Shift Type", &row.drives_shift_type)
            .section("Dates")
            .field("Start", format_date(&row.start_at))
            .field("End", format_date(&row.end_at))
            .section("Permissions");
        for (key, label) in PERMISSIONS {
            let value = row
                .permissions
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| *v);
            details.flag(label, value);
        }
        details
    }

    fn label(&self, row: &MembershipRow) -> String {
        row.user_name.clone()
    }

    fn create_kind(&self, relationships: &[(&str, ResourceIdentifier)]) -> String {
        relationships
            .iter()
            .find(|(name, _)| *name == "organization")
            .map(|(_, organization)| membership_kind(&organization.kind))
            .unwrap_or_else(|| MEMBERSHIPS.kind.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::Document;

    fn doc() -> Document {
        Document::parse(
            r#"{"data": [{"type": "broker-memberships", "id": "5",
                "attributes": {"kind": "manager", "is-admin": true, "is-rate-editor": false},
                "relationships": {
                    "user": {"data": {"type": "users", "id": "9"}},
                    "organization": {"data": {"type": "brokers", "id": "1"}},
                    "broker": {"data": {"type": "brokers", "id": "1"}}
                }}],
                "included": [
                    {"type": "users", "id": "9", "attributes": {"name": "Robin Reyes", "email-address": "robin@example.com"}},
                    {"type": "brokers", "id": "1", "attributes": {"company-name": "Acme"}}
                ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_row_resolves_user_and_organization() {
        let doc = doc();
        let row = Memberships.build_row(&doc.list().unwrap()[0], &doc.identity_map());
        assert_eq!(row.user_name, "Robin Reyes");
        assert_eq!(row.user_email, "robin@example.com");
        assert_eq!(row.user_mobile, "");
        assert_eq!(row.organization_type, "brokers");
        assert_eq!(row.organization_name, "Acme");
        assert_eq!(row.broker_name, "Acme");
        assert_eq!(row.permissions, vec![("is-rate-editor".to_string(), false)]);

        assert_eq!(
            Memberships.table(&[row]).to_text(),
            "ID  USER         TYPE    NAME  KIND\n5   Robin Reyes  Broker  Acme  manager\n"
        );
    }

    #[test]
    fn test_details_sections() {
        let doc = doc();
        let row = Memberships.build_row(&doc.list().unwrap()[0], &doc.identity_map());
        let text = ResourceView::details(&Memberships, &row).to_text();
        assert!(text.starts_with("ID: 5\nType: broker-memberships\n\nUser:\n  ID: 9\n"));
        assert!(text.contains("Role:\n  Kind: manager\n  Is Admin: yes\n"));
        assert!(text.contains("Permissions:\n  Is Rate Editor: no\n"));
        assert!(!text.contains("Project Office:"));
        assert!(!text.contains("Dates:"));
    }

    #[test]
    fn test_create_kind_follows_organization() {
        let linked = [
            ("user", ResourceIdentifier::new("users", "9")),
            ("organization", ResourceIdentifier::new("material-suppliers", "3")),
        ];
        assert_eq!(
            ResourceView::create_kind(&Memberships, &linked),
            "material-supplier-memberships"
        );
        assert_eq!(ResourceView::create_kind(&Memberships, &[]), "memberships");
        assert_eq!(organization_label("customers"), "Customer");
        assert_eq!(organization_label(""), "");
    }

    #[test]
    fn test_notification_filters_use_snake_case_params() {
        let filter = MEMBERSHIPS
            .filter("is-default-job-production-plan-subscriber")
            .unwrap();
        assert_eq!(filter.param, "is_default_job_production_plan_subscriber");
        for flag in [
            "is-equipment-rental-team-member",
            "is-geofence-violation-team-member",
            "is-unapproved-time-card-subscriber",
        ] {
            assert_eq!(MEMBERSHIPS.filter(flag).unwrap().param, flag.replace('-', "_"));
        }
    }

    #[test]
    fn test_owner_relationships_are_create_only() {
        assert!(MEMBERSHIPS.is_create_only("user"));
        assert!(MEMBERSHIPS.is_create_only("organization"));
        assert!(!MEMBERSHIPS.is_create_only("project-office"));
    }
}
