use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Update body for a user. Empty/absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl User {
    pub fn new(username: String, email: String, password: &str) -> Result<Self, ApiError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: hash_password(password)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Partial merge; a non-empty password is re-hashed. `updated_at` moves
    /// only if something changed.
    pub fn apply(&mut self, payload: &UserPayload) -> Result<(), ApiError> {
        let mut changed = false;

        if !payload.username.is_empty() {
            self.username = payload.username.clone();
            changed = true;
        }
        if !payload.email.is_empty() {
            self.email = payload.email.clone();
            changed = true;
        }
        if !payload.password.is_empty() {
            self.password_hash = hash_password(&payload.password)?;
            changed = true;
        }

        if changed {
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    pub fn valid_password(&self, password: &str) -> Result<bool, ApiError> {
        verify_password(password, &self.password_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_user() -> User {
        User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "password123",
        )
        .unwrap()
    }

    #[test]
    fn test_new_user_hashes_password() {
        let user = sample_user();
        assert_ne!(user.password_hash, "password123");
        assert!(user.valid_password("password123").unwrap());
        assert!(!user.valid_password("wrong").unwrap());
    }

    #[test]
    fn test_password_digest_never_serialized() {
        let value = serde_json::to_value(sample_user()).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("username").is_some());
    }

    #[test]
    fn test_apply_merges_populated_fields_only() {
        let mut user = sample_user();
        let original_hash = user.password_hash.clone();

        user.apply(&UserPayload {
            username: "renamed".to_string(),
            email: String::new(),
            password: String::new(),
        })
        .unwrap();

        assert_eq!(user.username, "renamed");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.password_hash, original_hash);
    }

    #[test]
    fn test_apply_rehashes_new_password() {
        let mut user = sample_user();
        user.apply(&UserPayload {
            username: String::new(),
            email: String::new(),
            password: "different456".to_string(),
        })
        .unwrap();

        assert!(user.valid_password("different456").unwrap());
        assert!(!user.valid_password("password123").unwrap());
    }

    #[test]
    fn test_apply_all_empty_is_a_noop() {
        let mut user = sample_user();
        let snapshot = user.clone();

        user.apply(&UserPayload::default()).unwrap();

        assert_eq!(user, snapshot);
    }
}
