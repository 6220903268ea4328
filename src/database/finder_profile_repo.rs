use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::models::FinderProfilesRow;

pub struct FinderProfileUpsert<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub university: &'a str,
    pub organization: &'a str,
    pub now: DateTime<Utc>,
}

// Keyed on account_id: a second submit updates the existing row.
const SQL_UPSERT: &str = r#"
INSERT INTO finder_profiles (
  account_id,
  full_name,
  email,
  university,
  organization,
  created_at,
  updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
ON CONFLICT (account_id) DO UPDATE SET
  full_name = excluded.full_name,
  email = excluded.email,
  university = excluded.university,
  organization = excluded.organization,
  updated_at = excluded.updated_at
RETURNING id
"#;

const SQL_LOAD_BY_ACCOUNT: &str = r#"
SELECT
  id,
  account_id,
  full_name,
  email,
  university,
  organization,
  created_at,
  updated_at
FROM finder_profiles
WHERE account_id = ?1
LIMIT 1
"#;

const SQL_CLEAR_OPPORTUNITIES: &str = r#"
DELETE FROM finder_profile_opportunities WHERE finder_profile_id = ?1
"#;

const SQL_COUNT_FOR_ACCOUNT: &str = r#"
SELECT COUNT(*) FROM finder_profiles WHERE account_id = ?1
"#;

pub async fn upsert<'e, E>(
    exec: E,
    account_id: i64,
    profile: FinderProfileUpsert<'_>,
) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_UPSERT)
        .bind(account_id)
        .bind(profile.full_name)
        .bind(profile.email)
        .bind(profile.university)
        .bind(profile.organization)
        .bind(profile.now)
        .fetch_one(exec)
        .await
}

pub async fn load_by_account<'e, E>(
    exec: E,
    account_id: i64,
) -> sqlx::Result<Option<FinderProfilesRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, FinderProfilesRow>(SQL_LOAD_BY_ACCOUNT)
        .bind(account_id)
        .fetch_optional(exec)
        .await
}

pub async fn clear_opportunities<'e, E>(exec: E, profile_id: i64) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_CLEAR_OPPORTUNITIES)
        .bind(profile_id)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn insert_opportunities<'e, E>(
    exec: E,
    profile_id: i64,
    opportunity_type_ids: &[i64],
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if opportunity_type_ids.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "INSERT INTO finder_profile_opportunities (finder_profile_id, opportunity_type_id) ",
    );
    qb.push_values(opportunity_type_ids.iter(), |mut row, type_id| {
        row.push_bind(profile_id).push_bind(*type_id);
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
