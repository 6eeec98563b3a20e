use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared HMAC secret used to sign and verify tokens.
    pub sign_key: String,
    /// JWT signing algorithm name, e.g. "HS512".
    pub encoding_alg: String,
    pub access_token_validity_seconds: i64,
    pub refresh_token_validity_seconds: i64,
    pub issuer: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            sign_key: env::var("ASSETBASE_JWT_SIGN_KEY")
                .unwrap_or_else(|_| "assetbase-dev-sign-key".to_string()),
            encoding_alg: env::var("ASSETBASE_JWT_ALG").unwrap_or_else(|_| "HS512".to_string()),
            access_token_validity_seconds: env::var("ASSETBASE_ACCESS_TOKEN_VALIDITY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            refresh_token_validity_seconds: env::var("ASSETBASE_REFRESH_TOKEN_VALIDITY_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604800),
            issuer: env::var("ASSETBASE_JWT_ISSUER").unwrap_or_else(|_| "assetbase".to_string()),
        }
    }
}
