// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::storage::UserStore;

/// State shared by every request task.
///
/// Both fields are read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    /// `None` when authentication is disabled for this process.
    pub verifier: Option<TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, verifier: Option<TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}

/// Empty in-memory store, authentication disabled.
#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(crate::store::InMemoryUserStore::new()), None)
    }
}

#[cfg(test)]
impl AppState {
    pub fn with_verifier(mut self, verifier: TokenVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }
}
