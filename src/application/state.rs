use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::authority::AuthorityService;
use crate::services::authorization::AuthorizationService;
use crate::services::role::RoleService;
use crate::services::user::UserService;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub authorities: Arc<AuthorityService>,
    pub roles: Arc<RoleService>,
    pub users: Arc<UserService>,
    pub authorization: Arc<AuthorizationService>,
}

impl AppState {
    pub fn new(
        db: DbConn,
        authorities: Arc<AuthorityService>,
        roles: Arc<RoleService>,
        users: Arc<UserService>,
        authorization: Arc<AuthorizationService>,
    ) -> Self {
        Self {
            db,
            authorities,
            roles,
            users,
            authorization,
        }
    }
}
