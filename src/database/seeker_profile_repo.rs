use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::models::SeekerProfilesRow;

pub struct SeekerProfileUpdate<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub university: &'a str,
    pub skills: &'a str,
    pub updated_at: DateTime<Utc>,
}

const SQL_INSERT_IF_MISSING: &str = r#"
INSERT INTO seeker_profiles (
  account_id,
  created_at,
  updated_at
) VALUES (?1, ?2, ?2)
ON CONFLICT (account_id) DO NOTHING
"#;

const SQL_LOAD_BY_ACCOUNT: &str = r#"
SELECT
  id,
  account_id,
  full_name,
  email,
  university,
  skills,
  profile_picture,
  resume,
  created_at,
  updated_at
FROM seeker_profiles
WHERE account_id = ?1
LIMIT 1
"#;

const SQL_UPDATE_FIELDS: &str = r#"
UPDATE seeker_profiles SET
  full_name = ?2,
  email = ?3,
  university = ?4,
  skills = ?5,
  updated_at = ?6
WHERE id = ?1
"#;

const SQL_CLEAR_INTERESTS: &str = r#"
DELETE FROM seeker_profile_interests WHERE seeker_profile_id = ?1
"#;

const SQL_COUNT_FOR_ACCOUNT: &str = r#"
SELECT COUNT(*) FROM seeker_profiles WHERE account_id = ?1
"#;

/// Creates an empty profile for the account unless one already exists.
/// Returns the number of rows inserted (0 or 1).
pub async fn insert_if_missing<'e, E>(
    exec: E,
    account_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_INSERT_IF_MISSING)
        .bind(account_id)
        .bind(now)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn load_by_account<'e, E>(
    exec: E,
    account_id: i64,
) -> sqlx::Result<Option<SeekerProfilesRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, SeekerProfilesRow>(SQL_LOAD_BY_ACCOUNT)
        .bind(account_id)
        .fetch_optional(exec)
        .await
}

pub async fn update_fields<'e, E>(
    exec: E,
    profile_id: i64,
    update: SeekerProfileUpdate<'_>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE_FIELDS)
        .bind(profile_id)
        .bind(update.full_name)
        .bind(update.email)
        .bind(update.university)
        .bind(update.skills)
        .bind(update.updated_at)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn clear_interests<'e, E>(exec: E, profile_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_CLEAR_INTERESTS)
        .bind(profile_id)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn insert_interests<'e, E>(
    exec: E,
    profile_id: i64,
    interest_ids: &[i64],
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if interest_ids.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "INSERT INTO seeker_profile_interests (seeker_profile_id, interest_id) ",
    );
    qb.push_values(interest_ids.iter(), |mut row, interest_id| {
        row.push_bind(profile_id).push_bind(*interest_id);
    });
    qb.push(" ON CONFLICT DO NOTHING");

    let res = qb.build().execute(exec).await?;
    Ok(res.rows_affected())
}

pub async fn count_for_account<'e, E>(exec: E, account_id: i64) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_COUNT_FOR_ACCOUNT)
        .bind(account_id)
        .fetch_one(exec)
        .await
}
