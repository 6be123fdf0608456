// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! OpenID Connect bearer-token authentication for the protected routes.
//!
//! ## Auth Flow
//!
//! 1. At startup, [`provider::discover_with_retry`] fetches the issuer's
//!    metadata and JWKS into an immutable [`ProviderTrust`]
//! 2. Clients send `Authorization: Bearer <JWT>`
//! 3. [`middleware::authenticate`] hands the token to the [`TokenVerifier`]:
//!    - signature against the discovered keys
//!    - `iss` equals the discovered issuer
//!    - `aud` contains the configured audience
//!    - `exp` not in the past
//! 4. The resulting [`VerifiedIdentity`] (`sub`, `email`, `name`) is attached
//!    to the request context for the handler
//!
//! ## Security
//!
//! - Without `OIDC_ISSUER`/`OIDC_AUDIENCE` the protected routes answer 503
//! - Every verification failure is reported as the same `invalid_token`
//! - Clock skew tolerance is 60 seconds
//!
//! ## Known Limitations
//!
//! - Signing keys are fetched once, at startup. After the provider rotates
//!   its keys, tokens signed with the new key fail as `invalid_token` until
//!   the service restarts. There is no refetch on an unknown `kid` and no
//!   TTL refresh.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod provider;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::VerifiedIdentity;
pub use error::AuthError;
pub use extractor::Authenticated;
pub use provider::{discover_with_retry, ProviderClient, ProviderError, ProviderTrust, RetryPolicy};
pub use verifier::{InvalidToken, TokenVerifier};
