pub mod authorities;
pub mod authorization;
pub mod roles;
pub mod users;

use axum::{middleware, Router};

use crate::middleware::require_auth;
use crate::state::AppState;

/// Create the full API router with the security middleware applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/authorization", authorization::routes(state.clone()))
        .nest("/api/users", users::routes(state.clone()))
        .nest("/api/roles", roles::routes(state.clone()))
        .nest("/api/authorities", authorities::routes(state))
        .layer(middleware::from_fn(require_auth))
}
