// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::verifier::InvalidToken;

/// Authentication failure returned by the middleware chain.
///
/// Verification failures are deliberately collapsed into
/// [`AuthError::InvalidToken`]; the concrete reason is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No issuer/audience configured for this process
    #[error("Authentication is not configured")]
    NotConfigured,
    /// Authorization header absent or not of the form `Bearer <token>`
    #[error("Authorization header with a Bearer token is required")]
    MissingCredential,
    /// Token failed signature, issuer, audience or expiry checks
    #[error("Token is invalid")]
    InvalidToken,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotConfigured => "oidc_not_configured",
            AuthError::MissingCredential => "missing_bearer",
            AuthError::InvalidToken => "invalid_token",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::MissingCredential | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<InvalidToken> for AuthError {
    fn from(_: InvalidToken) -> Self {
        AuthError::InvalidToken
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn not_configured_returns_503() {
        let (status, body) = body_of(AuthError::NotConfigured).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error_code"], "oidc_not_configured");
    }

    #[tokio::test]
    async fn missing_credential_returns_401() {
        let (status, body) = body_of(AuthError::MissingCredential).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "missing_bearer");
    }

    #[tokio::test]
    async fn invalid_token_returns_401() {
        let (status, body) = body_of(AuthError::from(InvalidToken)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error_code"], "invalid_token");
        assert_eq!(body["error"], "Token is invalid");
    }
}
