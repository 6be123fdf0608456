// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! usersvc - User Directory Service
//!
//! A small HTTP service exposing CRUD over users stored in PostgreSQL, with
//! OpenID Connect bearer-token authentication on its profile endpoint.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - OIDC discovery, token verification, authentication middleware
//! - `middleware` - Request id and CORS middleware
//! - `storage` - `UserStore` seam and the PostgreSQL implementation
//! - `server` - Startup sequence and graceful shutdown
//!
//! Test builds add `store`, an in-memory `UserStore` backing the test suites.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod models;
pub mod server;
pub mod state;
pub mod storage;
#[cfg(test)]
pub(crate) mod store;
pub mod telemetry;
