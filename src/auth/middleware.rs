// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to the protected subrouter only:
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/profile", get(profile))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), authenticate));
//! ```
//!
//! On success the [`VerifiedIdentity`] is attached to the request's
//! [`RequestContext`]; on failure the chain stops with an [`AuthError`] and
//! the handler never runs.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, TokenVerifier, VerifiedIdentity};
use crate::context::RequestContext;
use crate::state::AppState;

const BEARER_PREFIX: &str = "bearer ";

/// Authentication middleware function.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_headers(state.verifier.as_ref(), request.headers()) {
        Ok(identity) => {
            RequestContext::attach_identity(request.extensions_mut(), identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(error_code = e.error_code(), "Request authentication failed");
            e.into_response()
        }
    }
}

/// Authenticate a request from its headers.
///
/// Fails closed with [`AuthError::NotConfigured`] when the process runs
/// without a verifier.
pub fn authenticate_headers(
    verifier: Option<&TokenVerifier>,
    headers: &HeaderMap,
) -> Result<VerifiedIdentity, AuthError> {
    let verifier = verifier.ok_or(AuthError::NotConfigured)?;
    let token = bearer_token(headers)?;
    Ok(verifier.verify(token)?)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and the token is trimmed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    match value.get(..BEARER_PREFIX.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
            Ok(value[BEARER_PREFIX.len()..].trim())
        }
        _ => Err(AuthError::MissingCredential),
    }
}
