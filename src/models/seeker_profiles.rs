use chrono::{DateTime, Utc};

// One row per account; interests live in seeker_profile_interests.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SeekerProfilesRow {
    pub id: i64,
    pub account_id: i64,
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub skills: String,
    pub profile_picture: Option<String>,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
