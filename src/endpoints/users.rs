use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::permissions::{
    CreateUser, DeleteUser, EditUserAuthorities, EditUserRoles, ReadUser, UpdateUser,
};
use crate::middleware::{Authenticated, Authorized};
use crate::models::user;
use crate::repository::user::UserWithGrants;
use crate::schemas::page::{Page, PageQuery};
use crate::schemas::user::{
    CreateUserRequest, GrantAuthoritiesRequest, GrantRolesRequest, UpdateUserRequest,
};
use crate::services::security;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/current", get(current_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/:id/roles", put(add_roles).delete(remove_roles))
        .route(
            "/:id/authorities",
            put(add_authorities).delete(remove_authorities),
        )
        .with_state(state)
}

async fn list_users(
    _auth: Authorized<ReadUser>,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<UserWithGrants>>> {
    let pageable = query.into_pageable();
    Ok(Json(state.users.get_all_paged(&pageable).await?))
}

/// The user behind the current token
async fn current_user(
    Authenticated(claims): Authenticated,
    State(state): State<AppState>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(state.users.get_by_id(claims.user_id).await?))
}

async fn get_user(
    _auth: Authorized<ReadUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(state.users.get_by_id(id).await?))
}

async fn create_user(
    _auth: Authorized<CreateUser>,
    State(state): State<AppState>,
    Json(data): Json<CreateUserRequest>,
) -> Result<Json<UserWithGrants>> {
    data.validate()
        .map_err(|e| AppError::IllegalArgument(e.to_string()))?;

    let created = state
        .users
        .create(user::Model {
            id: Uuid::nil(),
            username: data.username,
            password: security::hash_password(&data.password)?,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone_number: data.phone_number,
            is_blocked: false,
        })
        .await?;
    Ok(Json(created))
}

async fn update_user(
    _auth: Authorized<UpdateUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateUserRequest>,
) -> Result<Json<UserWithGrants>> {
    data.validate()
        .map_err(|e| AppError::IllegalArgument(e.to_string()))?;

    let mut row = state.users.get_by_id(id).await?.user;

    if let Some(password) = data.password {
        row.password = security::hash_password(&password)?;
    }
    if let Some(first_name) = data.first_name {
        row.first_name = first_name;
    }
    if let Some(last_name) = data.last_name {
        row.last_name = last_name;
    }
    if let Some(email) = data.email {
        row.email = email;
    }
    if let Some(phone_number) = data.phone_number {
        row.phone_number = Some(phone_number);
    }
    if let Some(is_blocked) = data.is_blocked {
        row.is_blocked = is_blocked;
    }

    Ok(Json(state.users.update(row).await?))
}

async fn delete_user(
    _auth: Authorized<DeleteUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    state.users.delete_by_ids(&[id]).await?;
    Ok(Json(serde_json::json!({"message": "User deleted"})))
}

async fn add_roles(
    _auth: Authorized<EditUserRoles>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<GrantRolesRequest>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(state.users.add_roles(id, &data.role_ids).await?))
}

async fn remove_roles(
    _auth: Authorized<EditUserRoles>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<GrantRolesRequest>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(state.users.remove_roles(id, &data.role_ids).await?))
}

async fn add_authorities(
    _auth: Authorized<EditUserAuthorities>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<GrantAuthoritiesRequest>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(
        state.users.add_authorities(id, &data.authority_ids).await?,
    ))
}

async fn remove_authorities(
    _auth: Authorized<EditUserAuthorities>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<GrantAuthoritiesRequest>,
) -> Result<Json<UserWithGrants>> {
    Ok(Json(
        state
            .users
            .remove_authorities(id, &data.authority_ids)
            .await?,
    ))
}
