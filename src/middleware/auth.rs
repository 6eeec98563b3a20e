//! Security middleware for API routes
//!
//! Requires a valid bearer token for all endpoints except
//! `/api/authorization/*`. The token may arrive as an `access_token` cookie,
//! an `access_token` query parameter or an `Authorization: Bearer` header.

use axum::{
    extract::Request,
    http::header::{AUTHORIZATION, COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::services::security::{self, TokenClaims};

/// Parsed claims of the current request, stored in request extensions
#[derive(Clone)]
pub struct CurrentToken(pub TokenClaims);

/// Auth middleware that validates bearer tokens
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    let path = req.uri().path();

    // Token issuance itself is unauthenticated
    if path.starts_with("/api/authorization") {
        return next.run(req).await;
    }

    let token = match resolve_token(&req) {
        Ok(token) => token,
        Err(e) => return e.into_response(),
    };

    match security::parse_token(&token, &CONFIG.auth) {
        Ok(claims) => {
            req.extensions_mut().insert(CurrentToken(claims));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    }
}

/// Cookie and query parameter take precedence over the Authorization header.
fn resolve_token(req: &Request) -> Result<String> {
    if let Some(token) = cookie_token(req) {
        return Ok(token);
    }
    if let Some(token) = query_token(req) {
        return Ok(token);
    }
    header_token(req)
}

fn cookie_token(req: &Request) -> Option<String> {
    let cookies = req.headers().get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix("access_token=")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

fn query_token(req: &Request) -> Option<String> {
    let query = req.uri().query()?;
    query.split('&').find_map(|pair| {
        pair.strip_prefix("access_token=")
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

fn header_token(req: &Request) -> Result<String> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::NeedAuthorizationHeader)?;
    let value = header.to_str().map_err(|_| AppError::TokenInvalid)?;

    let (token_type, token) = value.split_once(' ').ok_or(AppError::TokenInvalid)?;
    if !token_type.eq_ignore_ascii_case("bearer") {
        return Err(AppError::UnsupportedTokenType);
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_missing_token_requires_authorization_header() {
        let err = resolve_token(&request("/api/users")).unwrap_err();
        assert!(matches!(err, AppError::NeedAuthorizationHeader));
    }

    #[test]
    fn test_bearer_header_token() {
        let mut req = request("/api/users");
        req.headers_mut()
            .insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(resolve_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_non_bearer_scheme_is_unsupported() {
        let mut req = request("/api/users");
        req.headers_mut()
            .insert(AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        let err = resolve_token(&req).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedTokenType));
    }

    #[test]
    fn test_cookie_token_wins_over_header() {
        let mut req = request("/api/users");
        req.headers_mut()
            .insert(AUTHORIZATION, "Bearer from-header".parse().unwrap());
        req.headers_mut()
            .insert(COOKIE, "theme=dark; access_token=from-cookie".parse().unwrap());
        assert_eq!(resolve_token(&req).unwrap(), "from-cookie");
    }

    #[test]
    fn test_query_parameter_token() {
        let req = request("/api/users?page=0&access_token=from-query");
        assert_eq!(resolve_token(&req).unwrap(), "from-query");
    }
}
