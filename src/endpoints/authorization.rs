use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use chrono::{TimeZone, Utc};

use crate::error::{AppError, Result};
use crate::schemas::token::{AuthorizationResponse, TokenRequest};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/oauth/token", post(token))
        .with_state(state)
}

/// OAuth-style token endpoint: `grant_type=password` exchanges credentials,
/// `grant_type=refresh_token` rotates a pair.
async fn token(
    State(state): State<AppState>,
    Form(request): Form<TokenRequest>,
) -> Result<Response> {
    let response = match request.grant_type.as_str() {
        "password" => {
            let username = request.username.to_lowercase();
            state
                .authorization
                .generate_token(&username, &request.password)
                .await?
        }
        "refresh_token" => {
            state
                .authorization
                .refresh_token(&request.refresh_token)
                .await?
        }
        _ => return Err(AppError::UnknownGrantType),
    };

    let cookie = access_token_cookie(&response);
    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

fn access_token_cookie(response: &AuthorizationResponse) -> HeaderValue {
    let expires = Utc
        .timestamp_opt(response.token_info.exp, 0)
        .single()
        .map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_default();
    let cookie = format!(
        "access_token={}; Expires={}; Path=/; HttpOnly",
        response.access_token, expires
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}
