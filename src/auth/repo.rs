use serde::Serialize;

use crate::config::AdminConfig;

/// Account allowed to log in. Password hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

/// Fixed set of accounts; there is no registration.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// A directory holding only the configured admin account.
    pub fn with_admin(admin: &AdminConfig) -> Self {
        Self {
            users: vec![User {
                id: 1,
                username: admin.username.clone(),
                password_hash: admin.password_hash.clone(),
                role: "admin".into(),
            }],
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }
}
