//! Token claims, the JWT codec and password hashing.
//!
//! Every issuance produces an access/refresh pair signed with the configured
//! HMAC algorithm. Both tokens carry the same claim snapshot taken from the
//! user at issuance time; the refresh token's `parent_id` references the
//! access token's `jti`.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::config::auth::AuthConfig;
use crate::error::{AppError, Result};
use crate::repository::user::UserWithGrants;
use crate::schemas::token::{AuthorizationResponse, TOKEN_TYPE_BEARER};

/// Signed token payload: identity plus the flattened permission snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
    pub authorities: Vec<String>,
    /// Empty for access tokens; the paired access token's `jti` for refresh
    /// tokens.
    #[serde(default)]
    pub parent_id: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

fn signing_algorithm(conf: &AuthConfig) -> Result<Algorithm> {
    conf.encoding_alg.parse().map_err(|_| {
        AppError::Internal(format!(
            "unsupported signing algorithm: {}",
            conf.encoding_alg
        ))
    })
}

/// Deduplicated union of the authorities of every role assigned to the user
/// and the user's additional authorities, preserving first-seen order.
pub fn flatten_authorities(user: &UserWithGrants) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut authorities = Vec::new();

    for role in &user.roles {
        for authority in &role.authorities {
            if seen.insert(authority.method.clone()) {
                authorities.push(authority.method.clone());
            }
        }
    }
    for authority in &user.additional_authorities {
        if seen.insert(authority.method.clone()) {
            authorities.push(authority.method.clone());
        }
    }

    authorities
}

fn build_claims(
    user: &UserWithGrants,
    conf: &AuthConfig,
    validity_seconds: i64,
    parent_id: String,
) -> TokenClaims {
    let issued_at = Utc::now().timestamp();

    TokenClaims {
        user_id: user.user.id,
        username: user.user.username.clone(),
        first_name: user.user.first_name.clone(),
        last_name: user.user.last_name.clone(),
        email: user.user.email.clone(),
        roles: user.roles.iter().map(|r| r.role.name.clone()).collect(),
        authorities: flatten_authorities(user),
        parent_id,
        jti: Uuid::new_v4().to_string(),
        iat: issued_at,
        exp: issued_at + validity_seconds,
        iss: conf.issuer.clone(),
    }
}

/// Issue an access/refresh token pair from a user snapshot.
pub fn issue_token_pair(user: &UserWithGrants, conf: &AuthConfig) -> Result<AuthorizationResponse> {
    let algorithm = signing_algorithm(conf)?;
    let key = EncodingKey::from_secret(conf.sign_key.as_bytes());
    let header = Header::new(algorithm);

    let access_claims = build_claims(user, conf, conf.access_token_validity_seconds, String::new());
    let refresh_claims = build_claims(
        user,
        conf,
        conf.refresh_token_validity_seconds,
        access_claims.jti.clone(),
    );

    let access_token = encode(&header, &access_claims, &key)?;
    let refresh_token = encode(&header, &refresh_claims, &key)?;

    Ok(AuthorizationResponse {
        access_token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        refresh_token,
        token_info: access_claims,
    })
}

/// Decode and validate a token, stripping an optional "Bearer " prefix.
pub fn parse_token(token: &str, conf: &AuthConfig) -> Result<TokenClaims> {
    let raw = token.strip_prefix("Bearer ").unwrap_or(token);
    let algorithm = signing_algorithm(conf)?;

    let mut validation = Validation::new(algorithm);
    validation.validate_exp = true;
    // No clock skew tolerance for expiration check
    validation.leeway = 0;

    match decode::<TokenClaims>(
        raw,
        &DecodingKey::from_secret(conf.sign_key.as_bytes()),
        &validation,
    ) {
        Ok(data) => Ok(data.claims),
        Err(e) => Err(match e.kind() {
            ErrorKind::ExpiredSignature => AppError::TokenExpired,
            ErrorKind::InvalidAlgorithm => AppError::UnexpectedSigningMethod,
            _ => AppError::TokenInvalid,
        }),
    }
}
