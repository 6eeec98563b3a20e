//! Authority checks as type-safe extractors
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Authorized, permissions::*};
//!
//! async fn list_users(
//!     _auth: Authorized<ReadUser>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Page<UserWithGrants>>> {
//!     // Authority already verified
//! }
//! ```

use std::marker::PhantomData;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::auth::CurrentToken;
use crate::services::catalog::OWNER_METHOD;
use crate::services::security::TokenClaims;

/// Trait for authority marker types
pub trait RequiredAuthority: Send + Sync + 'static {
    /// The authority method string (e.g., "READ_USER")
    const METHOD: &'static str;
}

/// Macro to define authority marker types
macro_rules! define_authorities {
    ($($(#[$meta:meta])* $name:ident => $method:expr),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl RequiredAuthority for $name {
                const METHOD: &'static str = $method;
            }
        )*
    };
}

define_authorities! {
    // User management
    ReadUser => "READ_USER",
    CreateUser => "CREATE_USER",
    UpdateUser => "UPDATE_USER",
    DeleteUser => "DELETE_USER",
    /// Grant or revoke roles on a user
    EditUserRoles => "EDIT_ROLE_USER",
    /// Grant or revoke additional authorities on a user
    EditUserAuthorities => "EDIT_AUTHORITY_USER",

    // Role management
    ReadRole => "READ_ROLE",
    CreateRole => "CREATE_ROLE",
    UpdateRole => "UPDATE_ROLE",
    DeleteRole => "DELETE_ROLE",

    // Authority management
    ReadAuthority => "READ_AUTHORITY",
    CreateAuthority => "CREATE_AUTHORITY",
    UpdateAuthority => "UPDATE_AUTHORITY",
    DeleteAuthority => "DELETE_AUTHORITY",
}

/// Extractor that requires a specific authority on the current token.
///
/// Tokens carrying the OWNER authority pass every check.
#[derive(Debug, Clone)]
pub struct Authorized<A: RequiredAuthority>(pub TokenClaims, PhantomData<A>);

impl<A: RequiredAuthority> Authorized<A> {
    pub fn claims(&self) -> &TokenClaims {
        &self.0
    }
}

#[async_trait]
impl<S, A> FromRequestParts<S> for Authorized<A>
where
    S: Send + Sync,
    A: RequiredAuthority,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<CurrentToken>()
            .ok_or(AppError::NeedAuthorizationHeader)?;

        let claims = &token.0;
        let allowed = claims
            .authorities
            .iter()
            .any(|a| a == OWNER_METHOD || a == A::METHOD);
        if !allowed {
            return Err(AppError::NotEnoughRights);
        }

        Ok(Authorized(claims.clone(), PhantomData))
    }
}

/// Extractor for any authenticated request, no specific authority required.
#[derive(Debug, Clone)]
pub struct Authenticated(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .extensions
            .get::<CurrentToken>()
            .ok_or(AppError::NeedAuthorizationHeader)?;

        Ok(Authenticated(token.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use uuid::Uuid;

    fn claims(authorities: &[&str]) -> TokenClaims {
        TokenClaims {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: "alice@example.com".to_string(),
            roles: vec![],
            authorities: authorities.iter().map(|a| a.to_string()).collect(),
            parent_id: String::new(),
            jti: Uuid::new_v4().to_string(),
            iat: 0,
            exp: 0,
            iss: "assetbase-test".to_string(),
        }
    }

    fn parts_with_token(token: Option<TokenClaims>) -> Parts {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        if let Some(claims) = token {
            request.extensions_mut().insert(CurrentToken(claims));
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_matching_authority_is_allowed() {
        let mut parts = parts_with_token(Some(claims(&["READ_USER"])));
        let result = Authorized::<ReadUser>::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_owner_overrides_every_check() {
        let mut parts = parts_with_token(Some(claims(&["OWNER"])));
        let result = Authorized::<DeleteRole>::from_request_parts(&mut parts, &()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_missing_authority_is_not_enough_rights() {
        let mut parts = parts_with_token(Some(claims(&["READ_USER"])));
        let result = Authorized::<DeleteUser>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::NotEnoughRights)));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let mut parts = parts_with_token(None);
        let result = Authorized::<ReadUser>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::NeedAuthorizationHeader)));
    }
}
