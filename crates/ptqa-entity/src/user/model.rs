//! User entity model.

use chrono::{DateTime, Utc};
use ptqa_core::types::id::UserId;
use serde::{Deserialize, Serialize};

use super::role::UserRole;
use super::status::UserStatus;

/// A row of the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Stored credential (clear text or an Argon2 PHC string).
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// User role.
    pub role: UserRole,
    /// Account status.
    #[serde(default)]
    pub status: UserStatus,
    /// When the user was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if the user can log in right now.
    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    /// Display name, falling back to the username.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Identifier to assign.
    pub id: UserId,
    /// Desired username.
    pub username: String,
    /// Credential as it will be stored.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Assigned role.
    pub role: UserRole,
    /// Initial status.
    pub status: UserStatus,
}

/// Profile changes for an existing user. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}
