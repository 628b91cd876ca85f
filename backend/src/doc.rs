//! OpenAPI documentation for the directory service.
//!
//! [`ApiDoc`] registers every HTTP handler, the page and error schemas, and
//! the session cookie security scheme. The `openapi-dump` binary prints it
//! for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{DirectoryRecord, Error, ErrorCode, Identity, Role};
use crate::inbound::http::auth::LoginForm;
use crate::inbound::http::directory::EmployeeForm;
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::views::{AddEmployeePage, DirectoryPage, LoginPage, RenderedView};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the directory service.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Personnel directory API",
        description = "Session-authenticated employee directory with role-gated record entry."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::root,
        crate::inbound::http::auth::login_page,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::whoami,
        crate::inbound::http::directory::list_directory,
        crate::inbound::http::directory::add_employee_page,
        crate::inbound::http::directory::add_employee,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Identity,
        Role,
        DirectoryRecord,
        LoginForm,
        EmployeeForm,
        RenderedView,
        LoginPage,
        DirectoryPage,
        AddEmployeePage,
        HealthStatus
    )),
    tags(
        (name = "auth", description = "Login, logout, and the current identity"),
        (name = "directory", description = "Directory search and record entry"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
