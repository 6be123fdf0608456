// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process startup and graceful shutdown.
//!
//! Startup order: storage pool and schema, then provider discovery (when
//! configured), then the listener. Any failure before the listener binds is
//! fatal. SIGINT or SIGTERM cancels a shared token that stops both the
//! discovery retry loop and the HTTP server.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{
    api::router,
    auth::{discover_with_retry, ProviderClient, ProviderError, RetryPolicy, TokenVerifier},
    config::{Config, OidcSettings},
    state::AppState,
    storage::{PgUserStore, StoreError},
};

/// Fatal errors raised before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("storage initialization failed: {0}")]
    Store(#[from] StoreError),
    #[error("OIDC provider discovery failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the service until a shutdown signal arrives.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let shutdown = CancellationToken::new();
    tokio::spawn(forward_shutdown_signal(shutdown.clone()));

    let store = PgUserStore::connect(&config.db_dsn, config.db_max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!(max_connections = config.db_max_connections, "Database ready");

    let verifier = match &config.oidc {
        Some(settings) => match build_verifier(settings, &shutdown).await {
            Ok(verifier) => Some(verifier),
            Err(e) => {
                store.close().await;
                return Err(e.into());
            }
        },
        None => {
            tracing::info!("OIDC disabled, protected routes will answer 503");
            None
        }
    };

    let store = Arc::new(store);
    let app = router(AppState::new(store.clone(), verifier));

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "usersvc listening (docs at /docs)"
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    store.close().await;
    tracing::info!("Server stopped");
    served.map_err(StartupError::from)
}

async fn build_verifier(
    settings: &OidcSettings,
    shutdown: &CancellationToken,
) -> Result<TokenVerifier, ProviderError> {
    let client = ProviderClient::new(&settings.issuer)?;
    let trust = discover_with_retry(&client, RetryPolicy::default(), shutdown).await?;
    tracing::info!(
        issuer = %trust.issuer(),
        audience = %settings.audience,
        "OIDC enabled"
    );
    Ok(TokenVerifier::new(Arc::new(trust), settings.audience.clone()))
}

/// Cancel `token` on SIGINT or SIGTERM.
async fn forward_shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
    token.cancel();
}
