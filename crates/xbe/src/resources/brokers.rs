//! Brokers: the organizations that run hauling operations.

use serde::Serialize;

use crate::jsonapi::attrs::{number_attr, opt_bool_attr, trimmed_attr};
use crate::jsonapi::{IdentityMap, NAME_LABEL, Resource, resolve_related};
use crate::render::{Details, Table};

use super::definition::{
    AttrKind, FULL_CRUD, FieldSet, QueryShape, ResourceDefinition, attribute, filter,
    same_attribute, same_filter, to_one,
};
use super::view::ResourceView;

const COMPANY_MAX: usize = 80;

pub const BROKERS: ResourceDefinition = ResourceDefinition {
    name: "brokers",
    kind: "brokers",
    singular: "broker",
    plural: "brokers",
    about: "Broker organizations",
    actions: FULL_CRUD,
    list: QueryShape {
        include: &[],
        fields: &[FieldSet {
            kind: "brokers",
            fields: &["company-name"],
        }],
    },
    show: QueryShape {
        include: &["default-financial-contact", "default-operations-contact", "default-dispatch-contact"],
        fields: &[FieldSet {
            kind: "users",
            fields: &["name"],
        }],
    },
    default_sort: Some("company-name"),
    filters: &[
        filter("company-name", "company-name", "Filter by company name"),
        same_filter("is-active", "Filter by active status (true/false)"),
        same_filter("is-default", "Filter by default broker (true/false)"),
        same_filter("sub-domain", "Filter by sub-domain"),
        same_filter("trailer-classification", "Filter by trailer classification ID"),
        same_filter("quickbooks-enabled", "Filter by QuickBooks enabled (true/false)"),
        same_filter("has-help-text", "Filter by presence of help text (true/false)"),
    ],
    attributes: &[
        attribute("name", "company-name", AttrKind::String, "Company name (required)"),
        same_attribute("abbreviation", AttrKind::String, "Short abbreviation"),
        same_attribute(
            "default-trucker-payment-terms",
            AttrKind::Int,
            "Default trucker payment terms (days)",
        ),
        same_attribute(
            "default-customer-payment-terms",
            AttrKind::Int,
            "Default customer payment terms (days)",
        ),
        same_attribute("is-transport-only", AttrKind::Bool, "Transport only (true/false)"),
        attribute(
            "default-reply-to-email",
            "default-reply-to-email-address",
            AttrKind::String,
            "Default reply-to email address",
        ),
        same_attribute("is-active", AttrKind::Bool, "Active status (true/false, admin only)"),
        same_attribute(
            "enable-implicit-time-card-approval",
            AttrKind::Bool,
            "Enable implicit time card approval (true/false)",
        ),
        same_attribute("remit-to-address", AttrKind::String, "Remit-to address"),
        same_attribute(
            "send-lineup-summaries-to",
            AttrKind::String,
            "Send lineup summaries to (email addresses)",
        ),
        same_attribute("quickbooks-enabled", AttrKind::Bool, "QuickBooks enabled (true/false)"),
        same_attribute("help-text", AttrKind::String, "Help text"),
        same_attribute(
            "public-dispatch-phone-number-explicit",
            AttrKind::String,
            "Public dispatch phone number",
        ),
        same_attribute(
            "enable-equipment-movement",
            AttrKind::Bool,
            "Enable equipment movement (true/false)",
        ),
        same_attribute(
            "requires-cost-code-allocations",
            AttrKind::Bool,
            "Requires cost code allocations (true/false)",
        ),
        same_attribute(
            "active-equipment-rental-notification-days",
            AttrKind::Json,
            "Active equipment rental notification days (JSON array, e.g. \"[1,2,3]\")",
        ),
    ],
    relationships: &[
        to_one(
            "default-financial-contact",
            "users",
            "Default financial contact user ID",
        ),
        to_one(
            "default-operations-contact",
            "users",
            "Default operations contact user ID",
        ),
        to_one("default-dispatch-contact", "users", "Default dispatch contact user ID"),
    ],
    required_on_create: &["name"],
    create_only: &[],
    create_requires_any: false,
    polymorphic: false,
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BrokerRow {
    pub id: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub abbreviation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_transport_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quickbooks_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_trucker_payment_terms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_customer_payment_terms: Option<f64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub remit_to_address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_financial_contact: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_operations_contact: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_dispatch_contact: String,
}

pub struct Brokers;

impl ResourceView for Brokers {
    type Row = BrokerRow;

    fn definition(&self) -> &'static ResourceDefinition {
        &BROKERS
    }

    fn build_row(&self, resource: &Resource, included: &IdentityMap<'_>) -> BrokerRow {
        let attrs = &resource.attributes;
        let contact = |name: &str| {
            resolve_related(resource, name, included, NAME_LABEL)
                .display()
                .to_string()
        };
        BrokerRow {
            id: resource.id.clone(),
            company_name: trimmed_attr(attrs, "company-name"),
            abbreviation: trimmed_attr(attrs, "abbreviation"),
            is_active: opt_bool_attr(attrs, "is-active"),
            is_transport_only: opt_bool_attr(attrs, "is-transport-only"),
            quickbooks_enabled: opt_bool_attr(attrs, "quickbooks-enabled"),
            default_trucker_payment_terms: number_attr(attrs, "default-trucker-payment-terms"),
            default_customer_payment_terms: number_attr(attrs, "default-customer-payment-terms"),
            remit_to_address: trimmed_attr(attrs, "remit-to-address"),
            default_financial_contact: contact("default-financial-contact"),
            default_operations_contact: contact("default-operations-contact"),
            default_dispatch_contact: contact("default-dispatch-contact"),
        }
    }

    fn table(&self, rows: &[BrokerRow]) -> Table {
        let mut table = Table::new().column("ID").truncated("COMPANY", COMPANY_MAX);
        for row in rows {
            table.add_row([row.id.as_str(), row.company_name.as_str()]);
        }
        table
    }

    fn details(&self, row: &BrokerRow) -> Details {
        let terms = |v: Option<f64>| v.map(|d| format!("{} days", d)).unwrap_or_default();
        let mut details = Details::new();
        details
            .field("ID", &row.id)
            .field("Company Name", &row.company_name)
            .field("Abbreviation", &row.abbreviation)
            .flag("Active", row.is_active)
            .flag("Transport Only", row.is_transport_only)
            .flag("QuickBooks Enabled", row.quickbooks_enabled)
            .field("Trucker Payment Terms", terms(row.default_trucker_payment_terms))
            .field("Customer Payment Terms", terms(row.default_customer_payment_terms))
            .field("Remit To", &row.remit_to_address)
            .section("Contacts")
            .field("Financial", &row.default_financial_contact)
            .field("Operations", &row.default_operations_contact)
            .field("Dispatch", &row.default_dispatch_contact);
        details
    }

    fn label(&self, row: &BrokerRow) -> String {
        row.company_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonapi::Document;

    #[test]
    fn test_rows_and_table() {
        let doc = Document::parse(
            r#"{"data": [
                {"type": "brokers", "id": "1", "attributes": {"company-name": " Acme Hauling "}},
                {"type": "brokers", "id": "22", "attributes": {"company-name": null}}
            ]}"#,
        )
        .unwrap();
        let included = doc.identity_map();
        let rows: Vec<BrokerRow> = doc
            .list()
            .unwrap()
            .iter()
            .map(|r| Brokers.build_row(r, &included))
            .collect();

        assert_eq!(rows[0].company_name, "Acme Hauling");
        assert_eq!(
            Brokers.table(&rows).to_text(),
            "ID  COMPANY\n1   Acme Hauling\n22  \n"
        );

        let json = serde_json::to_value(&rows[1]).unwrap();
        assert_eq!(json, serde_json::json!({"id": "22", "company_name": ""}));
    }

    #[test]
    fn test_details_skip_empty_contacts() {
        let doc = Document::parse(
            r#"{"data": {"type": "brokers", "id": "1",
                "attributes": {"company-name": "Acme", "is-active": true, "default-trucker-payment-terms": 30},
                "relationships": {
                    "default-financial-contact": {"data": {"type": "users", "id": "8"}},
                    "default-dispatch-contact": {"data": null}
                }},
                "included": [{"type": "users", "id": "8", "attributes": {"name": "Pat"}}]}"#,
        )
        .unwrap();
        let row = Brokers.build_row(doc.single().unwrap(), &doc.identity_map());
        assert_eq!(
            ResourceView::details(&Brokers, &row).to_text(),
            "ID: 1\nCompany Name: Acme\nActive: yes\nTrucker Payment Terms: 30 days\n\nContacts:\n  Financial: Pat\n"
        );
    }
}
