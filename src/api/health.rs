// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::SecondsFormat;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `db_unavailable`.
    pub status: String,
    /// Database clock (RFC 3339, UTC) when reachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_time: Option<String>,
    /// Failure summary when the database is unreachable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness check against the database.
///
/// Returns 200 with the database clock, or 503 when the store cannot answer.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database is unavailable", body = HealthResponse)
    )
)]
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.now().await {
        Ok(now) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                db_time: Some(now.to_rfc3339_opts(SecondsFormat::Secs, true)),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "db_unavailable".to_string(),
                    db_time: None,
                    error: Some("database is unavailable".to_string()),
                }),
            )
        }
    }
}
