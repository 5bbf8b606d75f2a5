//! User account record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Persisted user account.
///
/// Serialized with camelCase keys inside the `peak_users` blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Display name, trimmed at registration.
    pub name: String,
    /// Normalized email; unique across all users.
    pub email: String,
    /// Lowercase hex SHA-256 digest. Plaintext passwords are never stored.
    pub password_hash: String,
}

impl User {
    /// Creates a user with a generated stable ID.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
