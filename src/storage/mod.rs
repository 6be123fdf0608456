// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Storage
//!
//! The user table is owned by PostgreSQL; this module only defines the seam
//! handlers talk to ([`UserStore`]) and the error taxonomy storage calls can
//! produce.
//!
//! ## Implementations
//!
//! - [`PgUserStore`] - production store over a bounded `sqlx` pool
//! - `store::InMemoryUserStore` (test builds) - process-local store with the
//!   same uniqueness and ordering rules
//!
//! No call in this module retries; failures go straight back to the caller.

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{NewUser, User};

pub use postgres::PgUserStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint violated (duplicate email).
    #[error("user with email '{0}' already exists")]
    Conflict(String),
    /// No row matched the lookup.
    #[error("user not found")]
    NotFound,
    /// Underlying driver failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations over the user resource.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Current time as seen by the store. Used as a liveness probe.
    async fn now(&self) -> StoreResult<DateTime<Utc>>;

    /// Insert a user; duplicate emails yield [`StoreError::Conflict`].
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// Up to `limit` users, newest first.
    async fn list(&self, limit: u32) -> StoreResult<Vec<User>>;

    /// Fetch one user; [`StoreError::NotFound`] when absent.
    async fn get(&self, id: Uuid) -> StoreResult<User>;

    /// Delete one user; [`StoreError::NotFound`] when nothing was deleted.
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}
