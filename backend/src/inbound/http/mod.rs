//! HTTP inbound adapter: translates requests into directory service calls.

pub mod auth;
pub mod directory;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod views;

use actix_web::{HttpResponse, http::header, web};

pub use error::ApiResult;

/// `303 See Other` pointing at `location`.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Register the page and identity routes.
///
/// Session middleware and [`state::HttpState`] must be supplied by the
/// caller. Health probes are registered separately.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::root)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::whoami)
        .service(directory::list_directory)
        .service(directory::add_employee_page)
        .service(directory::add_employee);
}
