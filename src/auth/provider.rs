// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! OpenID Connect provider discovery.
//!
//! ## Handshake
//!
//! 1. `GET <issuer>/.well-known/openid-configuration`
//! 2. The advertised `issuer` must equal the configured one exactly
//! 3. `GET <jwks_uri>` and keep every key usable for signature checks
//!
//! The result is a [`ProviderTrust`]: built once at startup, then shared
//! read-only by every request. Discovery is retried with a fixed delay so the
//! service can start alongside its provider; exhausting the attempts is fatal.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Path appended to the issuer to fetch provider metadata.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Per-request timeout for discovery calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of discovery attempts before giving up.
pub const DEFAULT_DISCOVERY_ATTEMPTS: u32 = 30;

/// Default pause between discovery attempts.
pub const DEFAULT_DISCOVERY_DELAY: Duration = Duration::from_secs(2);

/// Provider discovery failure.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("issuer '{url}' is not a valid absolute URL: {reason}")]
    InvalidIssuer { url: String, reason: String },

    #[error("provider unreachable: {0}")]
    Unreachable(String),

    #[error("provider advertises issuer '{found}', expected '{expected}'")]
    IssuerMismatch { expected: String, found: String },

    #[error("provider JWKS contains no usable signing key")]
    NoUsableKeys,

    #[error("provider discovery failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ProviderError>,
    },

    #[error("provider discovery cancelled by shutdown")]
    Cancelled,
}

/// One signing key trusted for token verification.
#[derive(Clone)]
pub struct SigningKey {
    pub kid: Option<String>,
    pub algorithm: Algorithm,
    pub key: DecodingKey,
}

impl SigningKey {
    pub fn new(kid: Option<&str>, algorithm: Algorithm, key: DecodingKey) -> Self {
        Self {
            kid: kid.map(str::to_string),
            algorithm,
            key,
        }
    }

    /// Convert a JWK, skipping encryption keys and unknown algorithms.
    fn from_jwk(jwk: &Jwk) -> Option<Self> {
        if matches!(jwk.common.public_key_use, Some(PublicKeyUse::Encryption)) {
            return None;
        }
        let algorithm = jwk_algorithm(jwk)?;
        let key = match DecodingKey::from_jwk(jwk) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(kid = ?jwk.common.key_id, error = %e, "Skipping unusable JWK");
                return None;
            }
        };
        Some(Self {
            kid: jwk.common.key_id.clone(),
            algorithm,
            key,
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Trust material for one issuer. Immutable once built.
#[derive(Debug, Clone)]
pub struct ProviderTrust {
    issuer: String,
    keys: Vec<SigningKey>,
    algorithms: Vec<Algorithm>,
}

impl ProviderTrust {
    pub fn new(issuer: impl Into<String>, keys: Vec<SigningKey>, algorithms: Vec<Algorithm>) -> Self {
        Self {
            issuer: issuer.into(),
            keys,
            algorithms,
        }
    }

    /// Issuer identifier exactly as advertised by the provider.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn keys(&self) -> &[SigningKey] {
        &self.keys
    }

    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    /// Whether tokens signed with `alg` are accepted at all.
    pub fn supports(&self, alg: Algorithm) -> bool {
        self.algorithms.contains(&alg)
    }

    /// Keys that may have signed a token with the given header values.
    ///
    /// With a `kid` only that key qualifies; without one every key of the
    /// matching algorithm does.
    pub fn candidate_keys<'a>(
        &'a self,
        kid: Option<&'a str>,
        alg: Algorithm,
    ) -> impl Iterator<Item = &'a SigningKey> + 'a {
        self.keys.iter().filter(move |k| {
            k.algorithm == alg
                && match kid {
                    Some(kid) => k.kid.as_deref() == Some(kid),
                    None => true,
                }
        })
    }
}

/// Subset of the provider metadata document the service uses.
#[derive(Debug, Deserialize)]
struct ProviderMetadata {
    issuer: String,
    jwks_uri: String,
    #[serde(default)]
    id_token_signing_alg_values_supported: Vec<String>,
}

/// HTTP client for one configured issuer.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    issuer: String,
    discovery_url: Url,
    http: reqwest::Client,
}

impl ProviderClient {
    /// Create a client for `issuer_url`, which must be an absolute http(s) URL.
    pub fn new(issuer_url: &str) -> Result<Self, ProviderError> {
        let invalid = |reason: String| ProviderError::InvalidIssuer {
            url: issuer_url.to_string(),
            reason,
        };

        let parsed = Url::parse(issuer_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        let discovery_url = Url::parse(&format!(
            "{}{DISCOVERY_PATH}",
            issuer_url.trim_end_matches('/')
        ))
        .map_err(|e| invalid(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        Ok(Self {
            issuer: issuer_url.to_string(),
            discovery_url,
            http,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Run the discovery handshake once.
    pub async fn discover(&self) -> Result<ProviderTrust, ProviderError> {
        let metadata: ProviderMetadata = self.get_json(self.discovery_url.as_str()).await?;

        if metadata.issuer != self.issuer {
            return Err(ProviderError::IssuerMismatch {
                expected: self.issuer.clone(),
                found: metadata.issuer,
            });
        }

        let jwks: JwkSet = self.get_json(&metadata.jwks_uri).await?;
        let keys: Vec<SigningKey> = jwks.keys.iter().filter_map(SigningKey::from_jwk).collect();
        if keys.is_empty() {
            return Err(ProviderError::NoUsableKeys);
        }

        let mut algorithms: Vec<Algorithm> = metadata
            .id_token_signing_alg_values_supported
            .iter()
            .filter_map(|alg| Algorithm::from_str(alg).ok())
            .collect();
        if algorithms.is_empty() {
            algorithms.push(Algorithm::RS256);
        }

        Ok(ProviderTrust::new(metadata.issuer, keys, algorithms))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Unreachable(format!(
                "HTTP {} from {url}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Unreachable(format!("invalid response from {url}: {e}")))
    }
}

/// Bounded, fixed-delay retry schedule for discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_DISCOVERY_ATTEMPTS,
            delay: DEFAULT_DISCOVERY_DELAY,
        }
    }
}

/// Discover the provider, retrying per `policy`.
///
/// Blocks until discovery succeeds, attempts run out, or `shutdown` fires.
pub async fn discover_with_retry(
    client: &ProviderClient,
    policy: RetryPolicy,
    shutdown: &CancellationToken,
) -> Result<ProviderTrust, ProviderError> {
    let max_attempts = policy.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match client.discover().await {
            Ok(trust) => {
                tracing::info!(
                    issuer = %trust.issuer(),
                    keys = trust.keys().len(),
                    attempt,
                    "OIDC provider discovered"
                );
                return Ok(trust);
            }
            Err(e) if attempt >= max_attempts => {
                return Err(ProviderError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                tracing::warn!(
                    issuer = %client.issuer(),
                    attempt,
                    max_attempts,
                    error = %e,
                    "OIDC provider not ready, retrying"
                );
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(policy.delay) => {},
            _ = shutdown.cancelled() => return Err(ProviderError::Cancelled),
        }
    }
}

/// Signing algorithm for a JWK: its `alg` when present, else the key type default.
fn jwk_algorithm(jwk: &Jwk) -> Option<Algorithm> {
    if let Some(alg) = jwk.common.key_algorithm {
        return match alg {
            KeyAlgorithm::HS256 => Some(Algorithm::HS256),
            KeyAlgorithm::HS384 => Some(Algorithm::HS384),
            KeyAlgorithm::HS512 => Some(Algorithm::HS512),
            KeyAlgorithm::ES256 => Some(Algorithm::ES256),
            KeyAlgorithm::ES384 => Some(Algorithm::ES384),
            KeyAlgorithm::RS256 => Some(Algorithm::RS256),
            KeyAlgorithm::RS384 => Some(Algorithm::RS384),
            KeyAlgorithm::RS512 => Some(Algorithm::RS512),
            KeyAlgorithm::PS256 => Some(Algorithm::PS256),
            KeyAlgorithm::PS384 => Some(Algorithm::PS384),
            KeyAlgorithm::PS512 => Some(Algorithm::PS512),
            KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
            _ => None,
        };
    }

    Some(match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Algorithm::RS256,
        AlgorithmParameters::EllipticCurve(_) => Algorithm::ES256,
        AlgorithmParameters::OctetKeyPair(_) => Algorithm::EdDSA,
        AlgorithmParameters::OctetKey(_) => Algorithm::HS256,
    })
}
