use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::permissions::{CreateRole, DeleteRole, ReadRole, UpdateRole};
use crate::middleware::Authorized;
use crate::models::role;
use crate::repository::role::RoleWithAuthorities;
use crate::schemas::page::{Page, PageQuery};
use crate::schemas::role::{CreateRoleRequest, UpdateRoleRequest};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/:id",
            get(get_role).put(update_role).delete(delete_role),
        )
        .with_state(state)
}

async fn list_roles(
    _auth: Authorized<ReadRole>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<RoleWithAuthorities>>> {
    let pageable = query.into_pageable();
    Ok(Json(state.roles.get_all_paged(&pageable).await?))
}

async fn get_role(
    _auth: Authorized<ReadRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleWithAuthorities>> {
    Ok(Json(state.roles.get_by_id(id).await?))
}

async fn create_role(
    _auth: Authorized<CreateRole>,
    State(state): State<AppState>,
    Json(data): Json<CreateRoleRequest>,
) -> Result<Json<RoleWithAuthorities>> {
    let created = state
        .roles
        .create(
            role::Model {
                id: Uuid::nil(),
                name: data.name,
                description: data.description,
            },
            &data.authority_ids,
        )
        .await?;
    Ok(Json(created))
}

async fn update_role(
    _auth: Authorized<UpdateRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateRoleRequest>,
) -> Result<Json<RoleWithAuthorities>> {
    let existing = state.roles.get_by_id(id).await?;
    let mut row = existing.role;

    if let Some(name) = data.name {
        row.name = name;
    }
    if let Some(description) = data.description {
        row.description = Some(description);
    }

    let updated = state
        .roles
        .update(row, data.authority_ids.as_deref())
        .await?;
    Ok(Json(updated))
}

async fn delete_role(
    _auth: Authorized<DeleteRole>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.roles.delete_by_ids(&[id]).await?;
    Ok(Json(serde_json::json!({"message": "Role deleted"})))
}
