use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use crate::models::{AccountsRow, Role};

pub struct NewAccount<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub date_joined: DateTime<Utc>,
}

pub struct AccountProfileUpdate<'a> {
    pub bio: &'a str,
    pub skills: &'a str,
    pub role: Role,
    pub profile_picture: Option<&'a str>,
    pub resume: Option<&'a str>,
}

const SQL_INSERT_ACCOUNT: &str = r#"
INSERT INTO accounts (
  username,
  email,
  password_hash,
  role,
  date_joined
) VALUES (?1, ?2, ?3, ?4, ?5)
RETURNING id
"#;

const SQL_SELECT_ACCOUNT: &str = r#"
SELECT
  id,
  username,
  email,
  password_hash,
  role,
  bio,
  skills,
  profile_picture,
  resume,
  date_joined
FROM accounts
"#;

const SQL_USERNAME_EXISTS: &str = r#"
SELECT EXISTS (SELECT 1 FROM accounts WHERE username = ?1)
"#;

const SQL_UPDATE_ROLE: &str = r#"
UPDATE accounts SET role = ?2 WHERE id = ?1
"#;

// Media references are only replaced when a new one was submitted.
const SQL_UPDATE_PROFILE: &str = r#"
UPDATE accounts SET
  bio = ?2,
  skills = ?3,
  role = ?4,
  profile_picture = COALESCE(?5, profile_picture),
  resume = COALESCE(?6, resume)
WHERE id = ?1
"#;

pub async fn insert_account<'e, E>(exec: E, account: NewAccount<'_>) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_INSERT_ACCOUNT)
        .bind(account.username)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.role)
        .bind(account.date_joined)
        .fetch_one(exec)
        .await
}

pub async fn load_account<'e, E>(exec: E, account_id: i64) -> sqlx::Result<Option<AccountsRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("{} WHERE id = ?1 LIMIT 1", SQL_SELECT_ACCOUNT);
    sqlx::query_as::<_, AccountsRow>(&sql)
        .bind(account_id)
        .fetch_optional(exec)
        .await
}

/// Looks an account up by username, falling back to email. An exact
/// username match wins over an email match on another account. Emails are
/// not unique, so an email shared by several accounts matches none.
pub async fn find_by_login<'e, E>(exec: E, login: &str) -> sqlx::Result<Option<AccountsRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{} WHERE username = ?1 \
            OR (email = ?1 COLLATE NOCASE \
                AND (SELECT COUNT(*) FROM accounts WHERE email = ?1 COLLATE NOCASE) = 1) \
         ORDER BY (username = ?1) DESC LIMIT 1",
        SQL_SELECT_ACCOUNT
    );
    sqlx::query_as::<_, AccountsRow>(&sql)
        .bind(login)
        .fetch_optional(exec)
        .await
}

pub async fn username_exists<'e, E>(exec: E, username: &str) -> sqlx::Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, bool>(SQL_USERNAME_EXISTS)
        .bind(username)
        .fetch_one(exec)
        .await
}

pub async fn update_role<'e, E>(exec: E, account_id: i64, role: Role) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE_ROLE)
        .bind(account_id)
        .bind(role)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

pub async fn update_profile<'e, E>(
    exec: E,
    account_id: i64,
    update: AccountProfileUpdate<'_>,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE_PROFILE)
        .bind(account_id)
        .bind(update.bio)
        .bind(update.skills)
        .bind(update.role)
        .bind(update.profile_picture)
        .bind(update.resume)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}
