use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::permissions::{
    CreateAuthority, DeleteAuthority, ReadAuthority, UpdateAuthority,
};
use crate::middleware::Authorized;
use crate::models::authority;
use crate::schemas::authority::{CreateAuthorityRequest, UpdateAuthorityRequest};
use crate::schemas::page::{Page, PageQuery};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_authorities).post(create_authority))
        .route(
            "/:id",
            get(get_authority)
                .put(update_authority)
                .delete(delete_authority),
        )
        .with_state(state)
}

async fn list_authorities(
    _auth: Authorized<ReadAuthority>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<authority::Model>>> {
    let pageable = query.into_pageable();
    Ok(Json(state.authorities.get_all_paged(&pageable).await?))
}

async fn get_authority(
    _auth: Authorized<ReadAuthority>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<authority::Model>> {
    Ok(Json(state.authorities.get_by_id(id).await?))
}

async fn create_authority(
    _auth: Authorized<CreateAuthority>,
    State(state): State<AppState>,
    Json(data): Json<CreateAuthorityRequest>,
) -> Result<Json<authority::Model>> {
    let created = state
        .authorities
        .create(authority::Model {
            id: Uuid::nil(),
            method: data.method,
            description: data.description,
        })
        .await?;
    Ok(Json(created))
}

async fn update_authority(
    _auth: Authorized<UpdateAuthority>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateAuthorityRequest>,
) -> Result<Json<authority::Model>> {
    let mut row = state.authorities.get_by_id(id).await?;

    if let Some(method) = data.method {
        row.method = method;
    }
    if let Some(description) = data.description {
        row.description = Some(description);
    }

    Ok(Json(state.authorities.update(row).await?))
}

async fn delete_authority(
    _auth: Authorized<DeleteAuthority>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.authorities.delete_by_ids(&[id]).await?;
    Ok(Json(serde_json::json!({"message": "Authority deleted"})))
}
