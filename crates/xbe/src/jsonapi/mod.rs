//! JSON:API response mapping.
//!
//! Decoding flows from a raw body to a [`Document`], then through an
//! [`IdentityMap`] of included resources to flat rows:
//!
//! ```
//! use xbe::jsonapi::{resolve_related, Document, COMPANY_LABEL};
//!
//! let doc = Document::parse(r#"{
//!     "data": [{"type": "projects", "id": "1",
//!               "relationships": {"customer": {"data": {"type": "customers", "id": "4"}}}}],
//!     "included": [{"type": "customers", "id": "4", "attributes": {"company-name": "Acme"}}]
//! }"#).unwrap();
//!
//! let included = doc.identity_map();
//! let project = &doc.list().unwrap()[0];
//! let customer = resolve_related(project, "customer", &included, COMPANY_LABEL);
//! assert_eq!(customer.display(), "Acme");
//! ```

pub mod attrs;
mod document;
mod identity;
mod relationships;

pub use document::{Document, Linkage, PrimaryData, Relationship, Resource, ResourceIdentifier};
pub use identity::{IdentityMap, resource_key};
pub use relationships::{
    COMPANY_LABEL, NAME_LABEL, Related, TITLE_LABEL, label_of, resolve_related,
    resolve_related_of_kind,
};
