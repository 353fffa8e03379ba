use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - an author of posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamp.
    pub fn new(
        username: String,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            first_name,
            last_name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
    }
}

/// Partial update of a user's own profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}
