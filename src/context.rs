// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request context carried through the middleware chain.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Extensions},
};
use uuid::Uuid;

use crate::auth::VerifiedIdentity;

/// Request identifier plus, once authentication succeeds, the caller's identity.
///
/// Created by the request-id middleware and stored in the request extensions;
/// dropped with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: String,
    /// Set at most once, by the authentication step.
    pub identity: Option<VerifiedIdentity>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            identity: None,
        }
    }

    /// Context with a freshly generated request id.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Attach a verified identity to the context in `extensions`,
    /// creating the context when the request-id step did not run.
    pub fn attach_identity(extensions: &mut Extensions, identity: VerifiedIdentity) {
        match extensions.get_mut::<RequestContext>() {
            Some(context) => context.identity = Some(identity),
            None => {
                let mut context = RequestContext::generate();
                context.identity = Some(identity);
                extensions.insert(context);
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::generate))
    }
}
