//! Shared helpers for integration tests: an in-memory database, a fully
//! seeded service stack and the application router.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use assetbase::bootstrapper::create_app;
use assetbase::config::CONFIG;
use assetbase::migrations::Migrator;
use assetbase::services::authority::AuthorityService;
use assetbase::services::authorization::AuthorizationService;
use assetbase::services::role::RoleService;
use assetbase::services::user::UserService;
use assetbase::state::AppState;

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Build the application router over a fresh seeded in-memory database.
///
/// The token endpoints sign with `CONFIG.auth`, the same configuration the
/// security middleware verifies with.
pub async fn build_test_app() -> (axum::Router, DatabaseConnection) {
    let db = create_test_db().await;
    let ttl = Duration::from_secs(60);

    let authorities = Arc::new(AuthorityService::new(db.clone(), None, ttl));
    let roles = Arc::new(RoleService::new(db.clone(), None, ttl));
    let users = Arc::new(UserService::new(db.clone(), None, ttl));

    authorities.bootstrap().await.expect("authority bootstrap failed");
    roles
        .bootstrap(&authorities)
        .await
        .expect("role bootstrap failed");
    users.bootstrap(&roles).await.expect("user bootstrap failed");

    let authorization = Arc::new(AuthorizationService::new(
        users.clone(),
        CONFIG.auth.clone(),
    ));

    let state = AppState::new(db.clone(), authorities, roles, users, authorization);
    (create_app(state), db)
}

/// POST a form-encoded body and return (status, body string).
pub async fn post_form(app: axum::Router, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

/// Make a bearer-authenticated GET request and return (status, body string).
pub async fn authenticated_get(app: axum::Router, uri: &str, token: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

/// Obtain an access token for the given credentials via the token endpoint.
pub async fn login(app: axum::Router, username: &str, password: &str) -> String {
    let body = format!(
        "grant_type=password&username={}&password={}",
        username,
        urlencode(password)
    );
    let (status, response) = post_form(app, "/api/authorization/oauth/token", &body).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", response);

    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    parsed["access_token"].as_str().unwrap().to_string()
}

/// Minimal form-value escaping for the characters our fixtures use.
pub fn urlencode(value: &str) -> String {
    value.replace('@', "%40").replace('&', "%26")
}
