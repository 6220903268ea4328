use chrono::{DateTime, Utc};

use crate::models::Role;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountsRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub bio: String,
    pub skills: String,
    pub profile_picture: Option<String>,
    pub resume: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl AccountsRow {
    pub fn is_seeker(&self) -> bool {
        self.role.is_seeker()
    }

    pub fn is_finder(&self) -> bool {
        self.role.is_finder()
    }

    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            &self.email
        } else {
            &self.username
        }
    }
}
