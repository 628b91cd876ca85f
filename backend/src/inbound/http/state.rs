//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on the directory service and the rendering port.

use std::sync::Arc;

use crate::domain::DirectoryService;
use crate::inbound::http::views::{JsonViewRenderer, ViewRenderer};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Directory operations.
    pub directory: Arc<DirectoryService>,
    /// Page renderer.
    pub views: Arc<dyn ViewRenderer>,
}

impl HttpState {
    /// Bundle the service with a renderer.
    pub fn new(directory: Arc<DirectoryService>, views: Arc<dyn ViewRenderer>) -> Self {
        Self { directory, views }
    }

    /// Bundle the service with the JSON renderer.
    pub fn with_json_views(directory: Arc<DirectoryService>) -> Self {
        Self::new(directory, Arc::new(JsonViewRenderer))
    }
}
