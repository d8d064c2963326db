//! Broker commitments: capacity agreements between a broker and a trucker.

use serde::Serialize;

use crate::jsonapi::attrs::{format_datetime, trimmed_attr};
use crate::jsonapi::{
    COMPANY_LABEL, IdentityMap, Related, Resource, resolve_related, resolve_related_of_kind,
};
use crate::render::{Details, Table};

use super::definition::{
    FieldSet, QueryShape, READ_ONLY, ResourceDefinition, filter, same_filter,
};
use super::view::ResourceView;

const LIST_FIELDS: &[FieldSet] = &[
    FieldSet {
        kind: "broker-commitments",
        fields: &["status", "label", "buyer", "seller", "truck-scope"],
    },
    FieldSet {
        kind: "brokers",
        fields: &["company-name"],
    },
    FieldSet {
        kind: "truckers",
        fields: &["company-name"],
    },
];

pub const BROKER_COMMITMENTS: ResourceDefinition = ResourceDefinition {
    name: "broker-commitments",
    kind: "broker-commitments",
    singular: "broker commitment",
    plural: "broker commitments",
    about: "Commitments between brokers and truckers",
    actions: READ_ONLY,
    list: QueryShape {
        include: &["buyer", "seller"],
        fields: LIST_FIELDS,
    },
    show: QueryShape {
        include: &["buyer", "seller"],
        fields: &[
            FieldSet {
                kind: "brokers",
                fields: &["company-name"],
            },
            FieldSet {
                kind: "truckers",
                fields: &["company-name"],
            },
        ],
    },
    default_sort: None,
    filters: &[
        same_filter("status", "Filter by status"),
        filter("broker-id", "broker_id", "Filter by broker ID"),
        same_filter("broker", "Filter by broker ID"),
        filter("trucker-id", "trucker_id", "Filter by trucker ID"),
        same_filter("trucker", "Filter by trucker ID"),
        same_filter("created-at-min", "Filter by created-at on/after (ISO 8601)"),
        same_filter("created-at-max", "Filter by created-at on/before (ISO 8601)"),
        same_filter("updated-at-min", "Filter by updated-at on/after (ISO 8601)"),
        same_filter("updated-at-max", "Filter by updated-at on/before (ISO 8601)"),
    ],
    attributes: &[],
    relationships: &[],
    required_on_create: &[],
    create_only: &[],
    create_requires_any: false,
    polymorphic: false,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BrokerCommitmentRow {
    pub id: String,
    pub status: String,
    pub label: String,
    pub broker: String,
    pub broker_id: String,
    pub trucker: String,
    pub trucker_id: String,
    pub truck_scope_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
}

/// `buyer` when it is a broker, else a plain `broker` relationship.
fn party(
    resource: &Resource,
    typed: &str,
    kind: &str,
    fallback: &str,
    included: &IdentityMap<'_>,
) -> Related {
    resolve_related_of_kind(resource, typed, kind, included, COMPANY_LABEL)
        .unwrap_or_else(|| resolve_related(resource, fallback, included, COMPANY_LABEL))
}

pub struct BrokerCommitments;

impl ResourceView for BrokerCommitments {
    type Row = BrokerCommitmentRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &BROKER_COMMITMENTS
    }

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> BrokerCommitmentRow {
        let attrs = &resource.attributes;
        let broker = party(resource, "buyer", "brokers", "broker", included);
        let trucker = party(resource, "seller", "truckers", "trucker", included);
        BrokerCommitmentRow {
            id: resource.id.clone(),
            status: trimmed_attr(attrs, "status"),
            label: trimmed_attr(attrs, "label"),
            broker: broker.label,
            broker_id: broker.id,
            trucker: trucker.label,
            trucker_id: trucker.id,
            truck_scope_id: resource.related_id("truck-scope"),
            created_at: format_datetime(&trimmed_attr(attrs, "created-at")),
            updated_at: format_datetime(&trimmed_attr(attrs, "updated-at")),
        }
    }

    fn table(&self, rows: &[BrokerCommitmentRow]) -> Table {
        let mut table = Table::new()
            .column("ID")
            .column("STATUS")
            .truncated("BROKER", 25)
            .truncated("TRUCKER", 25)
            .truncated("LABEL", 20)
            .truncated("TRUCK SCOPE", 12);
        for row in rows {
            let broker: &str = if row.broker.is_empty() { &row.broker_id } else { &row.broker };
            let trucker: &str = if row.trucker.is_empty() { &row.trucker_id } else { &row.trucker };
            table.add_row([
                row.id.as_str(),
                row.status.as_str(),
                broker,
                trucker,
                row.label.as_str(),
                row.truck_scope_id.as_str(),
            ]);
        }
        table
    }

    fn details(&self, row: &BrokerCommitmentRow) -> Details {
        let named = |name: &str, id: &str| match (name.is_empty(), id.is_empty()) {
            (_, true) => String::new(),
            (true, false) => id.to_string(),
            (false, false) => format!("{} ({})", name, id),
        };
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Status", &row.status)
            .field("Label", &row.label)
            .field("Broker", named(&row.broker, &row.broker_id))
            .field("Trucker", named(&row.trucker, &row.trucker_id))
            .field("Truck Scope", &row.truck_scope_id)
            .field("Created", &row.created_at)
            .field("Updated", &row.updated_at);
        details
    }

    fn label(&self, row: &BrokerCommitmentRow) -> String {
        row.label.clone()
    }
}
