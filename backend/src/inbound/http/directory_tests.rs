//! Tests for the directory and add-employee handlers.

use super::*;
use crate::example_data::seed_directory_on_startup;
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{SESSION_COOKIE, test_session_middleware, test_state};
use crate::outbound::memory::InMemoryDirectoryRepository;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::Value;
use std::sync::Arc;

async fn seeded_store() -> Arc<InMemoryDirectoryRepository> {
    let store = Arc::new(InMemoryDirectoryRepository::new());
    seed_directory_on_startup(store.as_ref(), true)
        .await
        .expect("seed roster");
    store
}

async fn app(
    store: Arc<InMemoryDirectoryRepository>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(test_state(store)))
            .wrap(test_session_middleware())
            .configure(configure),
    )
    .await
}

async fn login_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/login")
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "login should succeed");
    res.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

fn location(res: &ServiceResponse) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn employee_form(email: &str) -> [(&'static str, String); 5] {
    [
        ("name", "Kim Park".to_owned()),
        ("department", "Finance".to_owned()),
        ("email", email.to_owned()),
        ("phone", "555-0111".to_owned()),
        ("job_title", "Controller".to_owned()),
    ]
}

fn names(body: &Value) -> Vec<String> {
    body["data"]["records"]
        .as_array()
        .expect("records array")
        .iter()
        .filter_map(|r| r["name"].as_str().map(str::to_owned))
        .collect()
}

#[actix_web::test]
async fn anonymous_directory_redirects_to_login() {
    let app = app(seeded_store().await).await;
    let res =
        test::call_service(&app, test::TestRequest::get().uri("/directory").to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/login"));
}

#[actix_web::test]
async fn employee_sees_full_directory() {
    let app = app(seeded_store().await).await;
    let cookie = login_cookie(&app, "employee", "userpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/directory")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["view"], "directory");
    assert_eq!(names(&body).len(), 10);
    assert_eq!(body["data"]["user"]["displayName"], "John Doe");
    assert_eq!(body["data"]["q"], Value::Null);
    assert_eq!(body["data"]["records"][0]["jobTitle"], "Senior Engineer");
}

#[rstest]
#[case("Engin", &["Alice Smith", "Bob Jones", "Eve Davis", "Hank Green"])]
#[case("hr", &["Charlie Brown", "Grace Lee"])]
#[case("company.com", &[])]
#[actix_web::test]
async fn search_filters_by_term(#[case] term: &str, #[case] expected: &[&str]) {
    let app = app(seeded_store().await).await;
    let cookie = login_cookie(&app, "employee", "userpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/directory?q={term}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(names(&body), expected);
    assert_eq!(body["data"]["q"], term);
}

#[rstest]
#[case(None, "/login")]
#[case(Some(("employee", "userpass")), "/directory")]
#[actix_web::test]
async fn add_employee_page_redirects_non_admins(
    #[case] login: Option<(&str, &str)>,
    #[case] target: &str,
) {
    let app = app(seeded_store().await).await;
    let mut req = test::TestRequest::get().uri("/add-employee");
    if let Some((username, password)) = login {
        req = req.cookie(login_cookie(&app, username, password).await);
    }
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(target));
}

#[actix_web::test]
async fn admin_sees_add_employee_form() {
    let app = app(seeded_store().await).await;
    let cookie = login_cookie(&app, "admin", "adminpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/add-employee")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["view"], "add_employee");
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert_eq!(body["data"]["error"], Value::Null);
}

#[actix_web::test]
async fn admin_adds_record() {
    let store = seeded_store().await;
    let app = app(Arc::clone(&store)).await;
    let cookie = login_cookie(&app, "admin", "adminpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-employee")
            .cookie(cookie)
            .set_form(employee_form("kim@company.com"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/directory"));
    assert_eq!(store.len(), 11);
}

#[actix_web::test]
async fn employee_cannot_add_record() {
    let store = seeded_store().await;
    let app = app(Arc::clone(&store)).await;
    let cookie = login_cookie(&app, "employee", "userpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-employee")
            .cookie(cookie)
            .set_form(employee_form("kim@company.com"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/directory"));
    assert_eq!(store.len(), 10);
}

#[actix_web::test]
async fn duplicate_email_renders_conflict() {
    let store = seeded_store().await;
    let app = app(Arc::clone(&store)).await;
    let cookie = login_cookie(&app, "admin", "adminpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-employee")
            .cookie(cookie)
            .set_form(employee_form("alice@company.com"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["error"], DUPLICATE_EMAIL);
    assert_eq!(store.len(), 10);
}

#[rstest]
#[case("not-an-email", "email")]
#[case("   ", "email")]
#[actix_web::test]
async fn invalid_fields_render_bad_request(#[case] email: &str, #[case] field: &str) {
    let store = seeded_store().await;
    let app = app(Arc::clone(&store)).await;
    let cookie = login_cookie(&app, "admin", "adminpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-employee")
            .cookie(cookie)
            .set_form(employee_form(email))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["field"], field);
    assert!(body["data"]["error"].is_string());
    assert_eq!(store.len(), 10);
}

#[actix_web::test]
async fn missing_form_fields_fail_validation() {
    let app = app(seeded_store().await).await;
    let cookie = login_cookie(&app, "admin", "adminpass").await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/add-employee")
            .cookie(cookie)
            .set_form([("name", "Kim Park")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["field"], "department");
}
