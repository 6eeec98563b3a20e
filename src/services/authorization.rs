//! Credential verification and token pair issuance.
//!
//! Verification is a chain of pluggable verifiers tried in order, first
//! success wins. Password verification is the only verifier wired in today;
//! alternatives (e.g. SSO) can be appended without changing the service
//! surface.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::config::auth::AuthConfig;
use crate::error::{AppError, Result};
use crate::schemas::token::AuthorizationResponse;
use crate::services::security;
use crate::services::user::UserService;

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, users: &UserService, username: &str, password: &str) -> Result<bool>;
}

/// Compares the password against the stored bcrypt hash.
pub struct PasswordVerifier;

#[async_trait]
impl CredentialVerifier for PasswordVerifier {
    async fn verify(&self, users: &UserService, username: &str, password: &str) -> Result<bool> {
        users.verify_credentials(username, password).await
    }
}

pub struct AuthorizationService {
    users: Arc<UserService>,
    auth: AuthConfig,
    verifiers: Vec<Box<dyn CredentialVerifier>>,
}

impl AuthorizationService {
    pub fn new(users: Arc<UserService>, auth: AuthConfig) -> Self {
        Self {
            users,
            auth,
            verifiers: vec![Box::new(PasswordVerifier)],
        }
    }

    /// Append an alternative credential verifier to the chain.
    pub fn with_verifier(mut self, verifier: Box<dyn CredentialVerifier>) -> Self {
        self.verifiers.push(verifier);
        self
    }

    /// Exchange username/password for an access+refresh token pair.
    pub async fn generate_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthorizationResponse> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        let mut authorized = false;
        for verifier in &self.verifiers {
            if verifier.verify(&self.users, username, password).await? {
                authorized = true;
                break;
            }
        }
        if !authorized {
            return Err(AppError::BadCredentials);
        }

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
        if user.user.is_blocked {
            return Err(AppError::UserBlocked);
        }

        security::issue_token_pair(&user, &self.auth)
    }

    /// Exchange a refresh token for a brand-new pair. The user is re-loaded
    /// fresh, so authority changes since the refresh token was issued are
    /// reflected in the new pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AuthorizationResponse> {
        let claims = security::parse_token(refresh_token, &self.auth)?;
        if claims.username.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        let user = self
            .users
            .find_by_username(&claims.username)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
        if user.user.is_blocked {
            return Err(AppError::UserBlocked);
        }

        security::issue_token_pair(&user, &self.auth)
    }
}
