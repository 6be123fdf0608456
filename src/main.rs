// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use usersvc::{
    config::{Config, LogFormat},
    server, telemetry,
};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init(LogFormat::from_env());

    let config = Config::from_env();
    tracing::info!(
        address = %config.bind_address(),
        auth = config.oidc.is_some(),
        "Starting usersvc"
    );

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "usersvc failed");
            ExitCode::FAILURE
        }
    }
}
