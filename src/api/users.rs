// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User CRUD endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateUserRequest, User},
    state::AppState,
};

/// Page size when the caller gives none (or an unusable one).
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Largest page size a caller may request.
pub const MAX_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Maximum number of users to return (1-1000, default 100).
    pub limit: Option<String>,
}

impl ListUsersQuery {
    /// Requested limit, falling back to the default when absent,
    /// unparseable, non-positive or above the ceiling.
    pub fn effective_limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| (1..=i64::from(MAX_LIST_LIMIT)).contains(n))
            .map(|n| n as u32)
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Path ids that are not UUIDs cannot match any row.
fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found())
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 201, body = User),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::invalid_payload(e.body_text()))?;
    let new_user = request.validate().map_err(ApiError::invalid_payload)?;

    let user = state.store.create(new_user).await?;
    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    tag = "Users",
    responses(
        (status = 200, body = [User]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.store.list(query.effective_limit()).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    tag = "Users",
    responses(
        (status = 200, body = User),
        (status = 404, description = "No such user"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_user_id(&id)?;
    Ok(Json(state.store.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    tag = "Users",
    responses(
        (status = 204),
        (status = 404, description = "No such user"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;
    state.store.delete(id).await?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
