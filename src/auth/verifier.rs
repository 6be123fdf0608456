// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification against discovered provider trust.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde_json::Value;

use super::claims::VerifiedIdentity;
use super::provider::ProviderTrust;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// The single, opaque verification failure handed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid token")]
pub struct InvalidToken;

/// Why a token was rejected. Logged, never returned.
#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("malformed token header: {0}")]
    MalformedHeader(jsonwebtoken::errors::Error),
    #[error("algorithm {0:?} not accepted by provider")]
    UnsupportedAlgorithm(Algorithm),
    #[error("no signing key matches kid {0:?}")]
    NoMatchingKey(Option<String>),
    #[error("token validation failed: {0}")]
    Validation(jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens for one issuer and audience.
///
/// Holds the trust material by `Arc`; cloning is cheap and verification
/// never takes a lock or touches the network.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    trust: Arc<ProviderTrust>,
    audience: String,
}

impl TokenVerifier {
    pub fn new(trust: Arc<ProviderTrust>, audience: impl Into<String>) -> Self {
        Self {
            trust,
            audience: audience.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        self.trust.issuer()
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify `raw` and extract the identity it proves.
    ///
    /// Signature, issuer, audience and expiry must all check out. Every
    /// failure maps to [`InvalidToken`].
    pub fn verify(&self, raw: &str) -> Result<VerifiedIdentity, InvalidToken> {
        self.validate(raw).map_err(|reason| {
            tracing::debug!(%reason, "Bearer token rejected");
            InvalidToken
        })
    }

    fn validate(&self, raw: &str) -> Result<VerifiedIdentity, Rejection> {
        let header = decode_header(raw).map_err(Rejection::MalformedHeader)?;
        if !self.trust.supports(header.alg) {
            return Err(Rejection::UnsupportedAlgorithm(header.alg));
        }

        let mut validation = Validation::new(header.alg);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_issuer(&[self.trust.issuer()]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        let mut last_error = None;
        for key in self.trust.candidate_keys(header.kid.as_deref(), header.alg) {
            match decode::<Value>(raw, &key.key, &validation) {
                Ok(data) => return Ok(VerifiedIdentity::from_claims(&data.claims)),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => Rejection::Validation(e),
            None => Rejection::NoMatchingKey(header.kid),
        })
    }
}
