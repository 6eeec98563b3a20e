use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone_number: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone_number: Option<i64>,
    pub is_blocked: Option<bool>,
}

/// Role or additional-authority grant/revoke payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRolesRequest {
    pub role_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantAuthoritiesRequest {
    pub authority_ids: Vec<Uuid>,
}
