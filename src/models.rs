// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response data structures used by the REST API. Types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Users
// =============================================================================

/// A user record as stored in `app_user`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    /// Server-generated identifier.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

impl CreateUserRequest {
    /// Check the payload before it reaches storage.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(self) -> Result<NewUser, String> {
        let email = self.email.trim();
        let name = self.name.trim();

        if email.is_empty() {
            return Err("email is required".to_string());
        }
        if !is_valid_email(email) {
            return Err(format!("email '{email}' is not a valid address"));
        }
        if name.is_empty() {
            return Err("name is required".to_string());
        }

        Ok(NewUser {
            email: email.to_string(),
            name: name.to_string(),
        })
    }
}

/// Structural email check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

// =============================================================================
// Identity
// =============================================================================

/// Static identity returned by `GET /api/v1/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DemoIdentity {
    pub id: String,
    pub name: String,
}

impl DemoIdentity {
    pub fn demo() -> Self {
        Self {
            id: "demo".to_string(),
            name: "Eugene".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, name: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn validate_accepts_well_formed_payload() {
        let user = request(" a@b.com ", " A ").validate().unwrap();
        assert_eq!(
            user,
            NewUser {
                email: "a@b.com".to_string(),
                name: "A".to_string(),
            }
        );
    }

    #[test]
    fn validate_rejects_bad_emails() {
        for email in ["", "plain", "@b.com", "a@", "a@b", "a@@b.com", "a b@c.com", "a@b..com", "a@.com"] {
            assert!(request(email, "A").validate().is_err(), "{email} accepted");
        }
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = request("a@b.com", "   ").validate().unwrap_err();
        assert_eq!(err, "name is required");
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let req: CreateUserRequest = serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert_eq!(req.name, "");
        assert!(req.validate().is_err());
    }

    #[test]
    fn user_serializes_created_at_as_rfc3339() {
        let user = User {
            id: Uuid::nil(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            created_at: DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["created_at"], "2026-01-02T03:04:05Z");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
