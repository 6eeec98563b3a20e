//! Test helpers for unit tests: in-memory SQLite databases and
//! cache-disabled service bundles.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::application::config::auth::AuthConfig;
use crate::migrations::Migrator;
use crate::services::authority::AuthorityService;
use crate::services::authorization::AuthorizationService;
use crate::services::role::RoleService;
use crate::services::user::UserService;

/// Create an in-memory SQLite database with the full schema applied
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        sign_key: "test-sign-key".to_string(),
        encoding_alg: "HS512".to_string(),
        access_token_validity_seconds: 3600,
        refresh_token_validity_seconds: 604800,
        issuer: "assetbase-test".to_string(),
    }
}

pub struct TestServices {
    pub authorities: Arc<AuthorityService>,
    pub roles: Arc<RoleService>,
    pub users: Arc<UserService>,
    pub authorization: Arc<AuthorizationService>,
}

/// Build the full service stack with caching disabled
pub fn create_services(db: &DatabaseConnection) -> TestServices {
    let ttl = Duration::from_secs(60);
    let authorities = Arc::new(AuthorityService::new(db.clone(), None, ttl));
    let roles = Arc::new(RoleService::new(db.clone(), None, ttl));
    let users = Arc::new(UserService::new(db.clone(), None, ttl));
    let authorization = Arc::new(AuthorizationService::new(users.clone(), test_auth_config()));

    TestServices {
        authorities,
        roles,
        users,
        authorization,
    }
}

/// Build the service stack and run the full seed sequence
pub async fn create_seeded_services(db: &DatabaseConnection) -> TestServices {
    let services = create_services(db);
    services
        .authorities
        .bootstrap()
        .await
        .expect("authority bootstrap failed");
    services
        .roles
        .bootstrap(&services.authorities)
        .await
        .expect("role bootstrap failed");
    services
        .users
        .bootstrap(&services.roles)
        .await
        .expect("user bootstrap failed");
    services
}
