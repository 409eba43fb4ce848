//! The authenticated identity held by the session.

use ptqa_core::types::id::UserId;
use serde::{Deserialize, Serialize};

use super::model::User;
use super::role::UserRole;
use super::status::UserStatus;

/// The authenticated principal. Persisted as JSON under `auth_user`;
/// never carries the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name written into audit records.
    pub name: String,
    /// Canonical role.
    pub role: UserRole,
    /// Account status at login time.
    #[serde(default)]
    pub status: UserStatus,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.display_name().to_string(),
            role: user.role,
            status: user.status,
        }
    }
}
