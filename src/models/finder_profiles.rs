use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FinderProfilesRow {
    pub id: i64,
    pub account_id: i64,
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub organization: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
