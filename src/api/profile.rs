// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity endpoints.

use axum::Json;

use crate::auth::{Authenticated, VerifiedIdentity};
use crate::models::DemoIdentity;

/// Static demo identity. Requires no authentication.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Identity",
    responses((status = 200, description = "Demo identity", body = DemoIdentity))
)]
pub async fn me() -> Json<DemoIdentity> {
    Json(DemoIdentity::demo())
}

/// Identity proven by the caller's bearer token.
///
/// Returns exactly what the authentication step attached to the request;
/// storage is never consulted.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Identity",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Verified identity", body = VerifiedIdentity),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 503, description = "Authentication is not configured"),
    )
)]
pub async fn profile(Authenticated(identity): Authenticated) -> Json<VerifiedIdentity> {
    Json(identity)
}
