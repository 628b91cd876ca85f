//! Directory listing and record-addition handlers.
//!
//! ```text
//! GET  /directory?q=   -> directory view, or 303 /login
//! GET  /add-employee   -> add-employee view (admin only)
//! POST /add-employee   -> 303 /directory, or add-employee view with an error
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    AddRecordOutcome, DenyReason, DirectoryListing, Error, Identity, RecordDraft, RequiredRole,
    SearchQuery,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::views::{
    AddEmployeePage, DirectoryPage, RenderedView, View, ViewRenderer, render_page,
};
use crate::inbound::http::{ApiResult, see_other};

/// Message shown when a submitted email is already on file.
pub const DUPLICATE_EMAIL: &str = "Error adding employee. Email might already exist.";

/// Query string for `GET /directory`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DirectoryQuery {
    /// Case-insensitive substring of a name, department, or job title.
    #[param(example = "Engin")]
    pub q: Option<String>,
}

/// Form body for `POST /add-employee`.
///
/// Absent fields arrive as empty strings and fail validation.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EmployeeForm {
    /// Full name.
    #[schema(example = "Kim Park")]
    pub name: String,
    /// Department.
    #[schema(example = "Finance")]
    pub department: String,
    /// Work email.
    #[schema(example = "kim@company.com")]
    pub email: String,
    /// Phone number.
    #[schema(example = "555-0111")]
    pub phone: String,
    /// Job title.
    #[schema(example = "Controller")]
    pub job_title: String,
}

impl From<EmployeeForm> for RecordDraft {
    fn from(form: EmployeeForm) -> Self {
        Self {
            name: form.name,
            department: form.department,
            email: form.email,
            phone: form.phone,
            job_title: form.job_title,
        }
    }
}

/// List directory records, optionally filtered by `q`.
#[utoipa::path(
    get,
    path = "/directory",
    params(DirectoryQuery),
    responses(
        (status = 200, description = "Directory view", body = RenderedView),
        (status = 303, description = "Not logged in; redirect to /login"),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["directory"],
    operation_id = "listDirectory"
)]
#[get("/directory")]
pub async fn list_directory(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DirectoryQuery>,
) -> ApiResult<HttpResponse> {
    let token = session.token()?;
    let DirectoryQuery { q } = query.into_inner();
    let search = SearchQuery::new(q.as_deref());

    match state
        .directory
        .list_directory(token.as_ref(), &search)
        .await?
    {
        DirectoryListing::LoginRequired => Ok(see_other("/login")),
        DirectoryListing::Records { viewer, records } => {
            let page = DirectoryPage {
                records,
                user: viewer,
                q,
            };
            render_page(state.views.as_ref(), View::Directory, &page, StatusCode::OK)
        }
    }
}

/// Show the add-employee form. Admin only.
#[utoipa::path(
    get,
    path = "/add-employee",
    responses(
        (status = 200, description = "Add-employee view", body = RenderedView),
        (status = 303, description = "Redirect to /login or /directory")
    ),
    tags = ["directory"],
    operation_id = "addEmployeePage"
)]
#[get("/add-employee")]
pub async fn add_employee_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let token = session.token()?;
    match state
        .directory
        .check_access(token.as_ref(), RequiredRole::Admin)
    {
        Ok(user) => employee_form(state.views.as_ref(), user, None, StatusCode::OK),
        Err(DenyReason::Unauthenticated) => Ok(see_other("/login")),
        Err(DenyReason::Forbidden) => Ok(see_other("/directory")),
    }
}

/// Add a directory record. Admin only.
#[utoipa::path(
    post,
    path = "/add-employee",
    request_body(content = EmployeeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Record added, or caller redirected to /login or /directory"),
        (status = 400, description = "A field failed validation", body = RenderedView),
        (status = 409, description = "Email already on file", body = RenderedView),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["directory"],
    operation_id = "addEmployee"
)]
#[post("/add-employee")]
pub async fn add_employee(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<EmployeeForm>,
) -> ApiResult<HttpResponse> {
    let token = session.token()?;
    let outcome = state
        .directory
        .add_record(token.as_ref(), form.into_inner().into())
        .await?;

    match outcome {
        AddRecordOutcome::Created(_) => Ok(see_other("/directory")),
        AddRecordOutcome::LoginRequired => Ok(see_other("/login")),
        AddRecordOutcome::Forbidden => Ok(see_other("/directory")),
        AddRecordOutcome::Invalid { admin, error } => employee_form(
            state.views.as_ref(),
            admin,
            Some((error.to_string(), Some(error.field().as_str().to_owned()))),
            StatusCode::BAD_REQUEST,
        ),
        AddRecordOutcome::Duplicate { admin, .. } => employee_form(
            state.views.as_ref(),
            admin,
            Some((DUPLICATE_EMAIL.to_owned(), None)),
            StatusCode::CONFLICT,
        ),
    }
}

fn employee_form(
    views: &dyn ViewRenderer,
    user: Identity,
    error: Option<(String, Option<String>)>,
    status: StatusCode,
) -> ApiResult<HttpResponse> {
    let (error, field) = match error {
        Some((message, field)) => (Some(message), field),
        None => (None, None),
    };
    let page = AddEmployeePage { user, error, field };
    render_page(views, View::AddEmployee, &page, status)
}

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
