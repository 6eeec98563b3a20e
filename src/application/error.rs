use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    #[error("username and password must not be null")]
    MissingCredentials,

    #[error("username or password is incorrect")]
    BadCredentials,

    #[error("unknown grant_type")]
    UnknownGrantType,

    #[error("unsupported token type")]
    UnsupportedTokenType,

    #[error("need authorization header")]
    NeedAuthorizationHeader,

    #[error("token is expired")]
    TokenExpired,

    #[error("for this operation need authorization header with valid bearer token")]
    TokenInvalid,

    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    #[error("not enough rights")]
    NotEnoughRights,

    #[error("user is blocked")]
    UserBlocked,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::IllegalArgument(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::MissingCredentials => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::BadCredentials => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::UnknownGrantType => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::UnsupportedTokenType => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NeedAuthorizationHeader => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::TokenInvalid => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::UnexpectedSigningMethod => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotEnoughRights => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::UserBlocked => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token signing error".to_string(),
                )
            }
            AppError::Bcrypt(e) => {
                tracing::error!("Bcrypt error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    async fn get_response_body(response: Response) -> (StatusCode, String) {
        let status = response.status();
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let body_str = String::from_utf8(bytes.to_vec()).unwrap();
        (status, body_str)
    }

    #[tokio::test]
    async fn test_illegal_argument_is_bad_request() {
        let error = AppError::IllegalArgument("ids must not be empty".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("ids must not be empty"));
    }

    #[tokio::test]
    async fn test_credential_errors_are_bad_request() {
        let (status, _) = get_response_body(AppError::MissingCredentials.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_response_body(AppError::BadCredentials.into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("username or password is incorrect"));
    }

    #[tokio::test]
    async fn test_token_errors_are_unauthorized() {
        let (status, body) = get_response_body(AppError::TokenExpired.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("token is expired"));

        let (status, _) = get_response_body(AppError::TokenInvalid.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            get_response_body(AppError::UnexpectedSigningMethod.into_response()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_not_enough_rights_is_forbidden() {
        let (status, body) = get_response_body(AppError::NotEnoughRights.into_response()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.contains("not enough rights"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let error = AppError::NotFound("user not found".to_string());
        let (status, body) = get_response_body(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("user not found"));
    }

    #[tokio::test]
    async fn test_json_error_response_format() {
        let error = AppError::UnknownGrantType;
        let (_, body) = get_response_body(error.into_response()).await;

        // Response should be JSON with "detail" field
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.get("detail").unwrap(), "unknown grant_type");
    }

    #[test]
    fn test_error_display_impl() {
        assert_eq!(
            AppError::MissingCredentials.to_string(),
            "username and password must not be null"
        );
        assert_eq!(AppError::TokenExpired.to_string(), "token is expired");
        assert_eq!(
            AppError::NotFound("role".to_string()).to_string(),
            "not found: role"
        );
    }
}
