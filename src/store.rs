// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! Mirrors the PostgreSQL rules that handlers rely on: emails are unique,
//! ids are server-generated, listings come back newest first. Compiled for
//! tests only; the service itself always runs on [`PgUserStore`].
//!
//! [`PgUserStore`]: crate::storage::PgUserStore

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewUser, User};
use crate::storage::{StoreError, StoreResult, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    /// Insertion order is creation order.
    users: RwLock<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn now(&self) -> StoreResult<DateTime<Utc>> {
        Ok(Utc::now())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(user.email));
        }

        // Keep timestamps monotonic so newest-first ordering is stable.
        let mut created_at = Utc::now();
        if let Some(last) = users.last() {
            if created_at <= last.created_at {
                created_at = last.created_at + chrono::Duration::microseconds(1);
            }
        }

        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            created_at,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list(&self, limit: u32) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn get(&self, id: Uuid) -> StoreResult<User> {
        let users = self.users.read().await;
        users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("a@b.com", "A")).await.unwrap();

        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.name, "A");
        assert!(!user.id.is_nil());
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = InMemoryUserStore::new();
        store.create(new_user("a@b.com", "A")).await.unwrap();

        let result = store.create(new_user("a@b.com", "Other")).await;
        assert!(matches!(result, Err(StoreError::Conflict(ref email)) if email == "a@b.com"));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_bounded() {
        let store = InMemoryUserStore::new();
        for i in 0..5 {
            store
                .create(new_user(&format!("u{i}@b.com"), "U"))
                .await
                .unwrap();
        }

        let listed = store.list(3).await.unwrap();
        let emails: Vec<_> = listed.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["u4@b.com", "u3@b.com", "u2@b.com"]);
        assert!(listed[0].created_at > listed[1].created_at);
    }

    #[tokio::test]
    async fn get_and_delete_report_missing_rows() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("a@b.com", "A")).await.unwrap();

        assert_eq!(store.get(user.id).await.unwrap(), user);
        store.delete(user.id).await.unwrap();

        assert!(matches!(store.get(user.id).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(user.id).await, Err(StoreError::NotFound)));
    }
}
