// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity claims and the verified identity attached to a request.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Identity claims read from a verified token payload.
///
/// Only the fields the service exposes; everything else in the payload is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
}

/// Identity proven by a successfully verified bearer token.
///
/// Lives for a single request and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifiedIdentity {
    /// Subject (the provider's user identifier)
    pub sub: String,
    /// Email address, empty when the token carries none
    pub email: String,
    /// Display name, empty when the token carries none
    pub name: String,
}

impl VerifiedIdentity {
    /// Build the identity from a verified claims payload.
    ///
    /// Decoding is lenient: when the payload does not fit the expected shape
    /// (for example `email` is not a string), every field that *is* a string
    /// is still picked up and the rest are left empty.
    pub fn from_claims(claims: &Value) -> Self {
        if !claims.is_object() {
            tracing::debug!("Token payload is not a JSON object");
            return Self::default();
        }

        match IdentityClaims::deserialize(claims) {
            Ok(parsed) => Self {
                sub: parsed.sub,
                email: parsed.email,
                name: parsed.name,
            },
            Err(e) => {
                tracing::debug!(error = %e, "Identity claims partially decoded");
                Self::from_fields(claims)
            }
        }
    }

    fn from_fields(claims: &Value) -> Self {
        let field = |key: &str| {
            claims
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            sub: field("sub"),
            email: field("email"),
            name: field("name"),
        }
    }
}
