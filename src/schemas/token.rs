use serde::{Deserialize, Serialize};

use crate::services::security::TokenClaims;

pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Body of `POST /api/authorization/oauth/token` (form-encoded).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub grant_type: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Successful token issuance: an access/refresh pair plus the access
/// token's decoded claim snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
    pub token_info: TokenClaims,
}
