use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthorityRequest {
    pub method: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAuthorityRequest {
    pub method: Option<String>,
    pub description: Option<String>,
}
