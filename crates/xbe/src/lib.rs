//! xbe: JSON:API client for the XBE logistics and construction platform.
//!
//! Every command maps to one endpoint: flags become a query string or a
//! JSON body, one request is issued, and the JSON:API response is decoded
//! and rendered as an aligned table or as JSON.
//!
//! # Layers
//!
//! - [`api`]: the [`ApiClient`] trait, the reqwest client and a scripted mock
//! - [`jsonapi`]: documents, the identity map and relationship resolution
//! - [`resources`]: table-driven resource definitions and row projections
//! - [`summary`]: server-side aggregation requests and column selection
//! - [`render`]: tables, detail views, JSON and sparse fieldsets
//! - [`operations`]: list/show/create/update/delete and summarize
//!
//! # Example
//!
//! ```
//! use xbe::api::MockClient;
//! use xbe::operations::{self, ListOptions};
//! use xbe::resources::find_resource;
//!
//! let client = MockClient::new().respond_json(
//!     200,
//!     serde_json::json!({"data": [
//!         {"type": "brokers", "id": "1", "attributes": {"company-name": "Acme"}}
//!     ]}),
//! );
//! let brokers = find_resource("brokers").unwrap();
//!
//! let mut out = Vec::new();
//! operations::list(&client, brokers, &ListOptions::default(), &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "ID  COMPANY\n1   Acme\n");
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod operations;
pub mod render;
pub mod resources;
pub mod summary;

pub use api::{ApiClient, HttpClient, MockClient, Query};
pub use auth::{DefaultTokenResolver, TokenResolver, resolve_token};
pub use config::{ClientConfig, ConfigFile};
pub use error::{Result, XbeError};
pub use render::OutputMode;
pub use resources::{RESOURCES, ResourceHandler, find_resource};
pub use summary::{SUMMARIES, SummaryDefinition, find_summary};
