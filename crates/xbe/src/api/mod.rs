//! HTTP access to the XBE API.
//!
//! Commands talk to the server through the [`ApiClient`] trait:
//!
//! - [`HttpClient`] - blocking reqwest client used by the CLI
//! - [`MockClient`] - scripted responses for tests

mod client;
mod mock;
mod query;

pub use client::{ApiClient, ApiResponse, HttpClient, JSON_API_MEDIA_TYPE, check_status};
pub use mock::{MockClient, RecordedRequest};
pub use query::Query;
