//! Rendering port for page responses.
//!
//! Handlers name a [`View`] and hand over a serialisable payload; the
//! configured [`ViewRenderer`] turns that into a response. The default
//! [`JsonViewRenderer`] answers `{"view": <name>, "data": <payload>}`, which
//! a front end or template layer can consume.

use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{DirectoryRecord, Error, Identity};

use super::ApiResult;

/// Pages the service can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Login form.
    Login,
    /// Record listing with the search box.
    Directory,
    /// Admin form for a new record.
    AddEmployee,
}

impl View {
    /// Stable view name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Directory => "directory",
            Self::AddEmployee => "add_employee",
        }
    }
}

/// Turns a named view and its data into a response.
pub trait ViewRenderer: Send + Sync {
    /// Build the response for `view` from its serialised `payload`.
    fn render(&self, view: View, payload: Value, status: StatusCode) -> HttpResponse;
}

/// Renders views as JSON envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

/// Envelope produced by [`JsonViewRenderer`].
#[derive(Debug, Serialize, ToSchema)]
pub struct RenderedView {
    /// Name of the rendered view.
    #[schema(example = "directory")]
    pub view: String,
    /// View-specific payload.
    pub data: Value,
}

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, view: View, payload: Value, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(RenderedView {
            view: view.name().to_owned(),
            data: payload,
        })
    }
}

/// Data for the `login` view.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginPage {
    /// Message from the last failed attempt.
    pub error: Option<String>,
}

/// Data for the `directory` view.
#[derive(Debug, Serialize, ToSchema)]
pub struct DirectoryPage {
    /// Matching records in store order.
    pub records: Vec<DirectoryRecord>,
    /// Viewer.
    pub user: Identity,
    /// Search term echoed back.
    pub q: Option<String>,
}

/// Data for the `add_employee` view.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddEmployeePage {
    /// Admin filling in the form.
    pub user: Identity,
    /// Why the last submission was rejected.
    pub error: Option<String>,
    /// Submitted field that failed validation.
    #[schema(example = "email")]
    pub field: Option<String>,
}

/// Serialise `page` and hand it to `renderer`.
pub(crate) fn render_page<T: Serialize>(
    renderer: &dyn ViewRenderer,
    view: View,
    page: &T,
    status: StatusCode,
) -> ApiResult<HttpResponse> {
    let payload = serde_json::to_value(page).map_err(|err| {
        Error::internal(format!("failed to serialise {} view: {err}", view.name()))
    })?;
    Ok(renderer.render(view, payload, status))
}
