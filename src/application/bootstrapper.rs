//! Application bootstrapper
//!
//! Handles all initialization and setup for the assetbase backend.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::cache;
use crate::application::database;
use crate::config::CONFIG;
use crate::endpoints;
use crate::services::authority::AuthorityService;
use crate::services::authorization::AuthorizationService;
use crate::services::role::RoleService;
use crate::services::user::UserService;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting assetbase backend v{}", env!("CARGO_PKG_VERSION"));

    let state = init_services().await?;

    let app = create_app(state);

    serve(app).await
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("assetbase={}", CONFIG.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Initialize all application services and seed the well-known rows.
///
/// Seed ordering matters: roles reference authority identities and the
/// default admin user references the ADMIN role, so authorities are seeded
/// first, then roles, then the user.
async fn init_services() -> anyhow::Result<AppState> {
    let db = database::connect().await?;
    tracing::info!("Database connection established");

    let cache_conn = cache::try_connect().await;
    let ttl = Duration::from_secs(CONFIG.cache.listing_ttl_seconds);

    let authorities = Arc::new(AuthorityService::new(db.clone(), cache_conn.clone(), ttl));
    let roles = Arc::new(RoleService::new(db.clone(), cache_conn.clone(), ttl));
    let users = Arc::new(UserService::new(db.clone(), cache_conn.clone(), ttl));

    authorities.bootstrap().await?;
    roles.bootstrap(&authorities).await?;
    users.bootstrap(&roles).await?;
    tracing::info!("Seed data verified");

    let authorization = Arc::new(AuthorizationService::new(
        users.clone(),
        CONFIG.auth.clone(),
    ));

    Ok(AppState::new(db, authorities, roles, users, authorization))
}

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
async fn serve(app: Router) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
