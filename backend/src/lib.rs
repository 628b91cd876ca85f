//! Personnel directory backend library.
//!
//! Domain types and services live in [`domain`]; [`inbound`] adapts them to
//! HTTP and [`outbound`] provides the record store.

pub mod config;
pub mod doc;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use middleware::{Trace, TraceId};
