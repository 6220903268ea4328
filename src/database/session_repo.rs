use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::models::SessionsRow;

const SQL_INSERT_SESSION: &str = r#"
INSERT INTO sessions (
  id,
  account_id,
  created_at,
  expires_at
) VALUES (?1, ?2, ?3, ?4)
"#;

const SQL_LOAD_SESSION: &str = r#"
SELECT
  id,
  account_id,
  created_at,
  expires_at
FROM sessions
WHERE id = ?1
LIMIT 1
"#;

const SQL_DELETE_SESSION: &str = r#"
DELETE FROM sessions WHERE id = ?1
"#;

const SQL_DELETE_EXPIRED_FOR_ACCOUNT: &str = r#"
DELETE FROM sessions WHERE account_id = ?1 AND expires_at <= ?2
"#;

pub async fn insert_session<'e, E>(
    exec: E,
    session_id: &str,
    account_id: i64,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(SQL_INSERT_SESSION)
        .bind(session_id)
        .bind(account_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(exec)
        .await?;
    Ok(())
}

pub async fn load_session<'e, E>(exec: E, session_id: &str) -> sqlx::Result<Option<SessionsRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, SessionsRow>(SQL_LOAD_SESSION)
        .bind(session_id)
        .fetch_optional(exec)
        .await
}

pub async fn delete_session<'e, E>(exec: E, session_id: &str) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_SESSION)
        .bind(session_id)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn delete_expired_for_account<'e, E>(
    exec: E,
    account_id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_DELETE_EXPIRED_FOR_ACCOUNT)
        .bind(account_id)
        .bind(now)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}
