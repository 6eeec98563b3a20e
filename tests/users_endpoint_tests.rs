//! Users endpoint integration tests
//!
//! Covers:
//! - `GET /api/users` — paginated listing (requires READ_USER)
//! - `POST /api/users` — create (requires CREATE_USER)
//! - `PUT /api/users/{id}/roles` / `DELETE` — role grants (EDIT_ROLE_USER)
//! - `PUT /api/users/{id}/authorities` — additional authorities
//! - Freshly granted authorities appearing in the next issued token

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

mod common;
use common::{authenticated_get, build_test_app, login, urlencode};

async fn authenticated_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    json_body: &str,
) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json_body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn test_list_users_is_paginated() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    let (status, response) =
        authenticated_get(app, "/api/users?page=0&size=20&sort=username,asc", &token).await;
    assert_eq!(status, StatusCode::OK);

    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(parsed["totalElements"], 1);
    assert_eq!(parsed["totalPages"], 1);
    assert_eq!(parsed["content"][0]["username"], "assets");
}

#[tokio::test]
async fn test_create_user_normalizes_and_hides_password() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    let (status, response) = authenticated_json(
        app.clone(),
        "POST",
        "/api/users",
        &token,
        r#"{"username": "Bob", "password": "hunter22", "email": "Bob@Example.com"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", response);

    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(parsed["username"], "bob");
    assert_eq!(parsed["email"], "bob@example.com");
    assert!(parsed.get("password").is_none());

    // The new user can authenticate with the plain password.
    let _ = login(app, "bob", "hunter22").await;
}

#[tokio::test]
async fn test_create_user_with_invalid_email_is_bad_request() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    let (status, _) = authenticated_json(
        app,
        "POST",
        "/api/users",
        &token,
        r#"{"username": "bob", "password": "hunter22", "email": "not-an-email"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_role_grant_round_trip_shows_up_in_next_token() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    // Create a plain user without roles.
    let (_, response) = authenticated_json(
        app.clone(),
        "POST",
        "/api/users",
        &token,
        r#"{"username": "carol", "password": "hunter22", "email": "carol@example.com"}"#,
    )
    .await;
    let user: serde_json::Value = serde_json::from_str(&response).unwrap();
    let user_id = user["id"].as_str().unwrap();

    // Grant the USER role.
    let (_, response) = authenticated_get(app.clone(), "/api/roles?size=50", &token).await;
    let roles: serde_json::Value = serde_json::from_str(&response).unwrap();
    let user_role = roles["content"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "USER")
        .unwrap();
    let role_id = user_role["id"].as_str().unwrap();

    let (status, response) = authenticated_json(
        app.clone(),
        "PUT",
        &format!("/api/users/{}/roles", user_id),
        &token,
        &format!(r#"{{"role_ids": ["{}"]}}"#, role_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", response);

    // A token issued after the grant carries the new snapshot.
    let body = format!(
        "grant_type=password&username=carol&password={}",
        urlencode("hunter22")
    );
    let (_, response) =
        common::post_form(app.clone(), "/api/authorization/oauth/token", &body).await;
    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    let authorities = parsed["token_info"]["authorities"].as_array().unwrap();
    assert!(authorities.iter().any(|a| a == "READ_USER"));

    // Revoke the role again.
    let (status, response) = authenticated_json(
        app,
        "DELETE",
        &format!("/api/users/{}/roles", user_id),
        &token,
        &format!(r#"{{"role_ids": ["{}"]}}"#, role_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", response);
    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert!(parsed["roles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_additional_authority_grant() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    let (_, response) = authenticated_json(
        app.clone(),
        "POST",
        "/api/users",
        &token,
        r#"{"username": "dave", "password": "hunter22", "email": "dave@example.com"}"#,
    )
    .await;
    let user: serde_json::Value = serde_json::from_str(&response).unwrap();
    let user_id = user["id"].as_str().unwrap();

    let (_, response) =
        authenticated_get(app.clone(), "/api/authorities?size=50", &token).await;
    let authorities: serde_json::Value = serde_json::from_str(&response).unwrap();
    let read_asset = authorities["content"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["method"] == "READ_ASSET")
        .unwrap();
    let authority_id = read_asset["id"].as_str().unwrap();

    let (status, response) = authenticated_json(
        app,
        "PUT",
        &format!("/api/users/{}/authorities", user_id),
        &token,
        &format!(r#"{{"authority_ids": ["{}"]}}"#, authority_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", response);

    let parsed: serde_json::Value = serde_json::from_str(&response).unwrap();
    let granted = parsed["authorities"].as_array().unwrap();
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0]["method"], "READ_ASSET");
}

#[tokio::test]
async fn test_delete_user() {
    let (app, _db) = build_test_app().await;
    let token = login(app.clone(), "assets", "Deadline@777").await;

    let (_, response) = authenticated_json(
        app.clone(),
        "POST",
        "/api/users",
        &token,
        r#"{"username": "erin", "password": "hunter22", "email": "erin@example.com"}"#,
    )
    .await;
    let user: serde_json::Value = serde_json::from_str(&response).unwrap();
    let user_id = user["id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/api/users/{}", user_id))
        .method("DELETE")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) =
        authenticated_get(app, &format!("/api/users/{}", user_id), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
