// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated identity.
//!
//! Use the `Authenticated` extractor in handlers behind the auth middleware:
//!
//! ```rust,ignore
//! async fn my_handler(Authenticated(identity): Authenticated) -> impl IntoResponse {
//!     // identity is VerifiedIdentity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{middleware::authenticate_headers, AuthError, VerifiedIdentity};
use crate::context::RequestContext;
use crate::state::AppState;

/// Extractor for the identity attached by the authentication middleware.
///
/// When the middleware already ran, the identity is taken from the
/// [`RequestContext`]. Otherwise the request is authenticated here with the
/// same rules, so a handler can never observe a half-populated context.
pub struct Authenticated(pub VerifiedIdentity);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts
            .extensions
            .get::<RequestContext>()
            .and_then(|context| context.identity.clone())
        {
            return Ok(Authenticated(identity));
        }

        let identity = authenticate_headers(state.verifier.as_ref(), &parts.headers)?;
        RequestContext::attach_identity(&mut parts.extensions, identity.clone());
        Ok(Authenticated(identity))
    }
}
