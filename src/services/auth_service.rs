use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::{account_repo, session_repo};
use crate::error::{AppError, AppResult};
use crate::models::{AccountsRow, Role};
use crate::services::password;
use crate::services::validation::{FieldErrors, NON_FIELD};

pub const SESSION_TTL_DAYS: i64 = 14;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 150;

pub const MSG_USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const MSG_BAD_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
    pub is_finder: bool,
}

impl SignupInput {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        errors.required("username", username);
        errors.max_chars("username", username, MAX_USERNAME_LEN);
        if !username.is_empty() && !is_valid_username(username) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        errors.required("email", &self.email);
        errors.email("email", &self.email);

        errors.required("password1", &self.password1);
        if !self.password1.is_empty() {
            if self.password1.chars().count() < MIN_PASSWORD_LEN {
                errors.add(
                    "password1",
                    format!(
                        "This password is too short. It must contain at least {} characters.",
                        MIN_PASSWORD_LEN
                    ),
                );
            }
            if self.password1.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password1", "This password is entirely numeric.");
            }
        }

        errors.required("password2", &self.password2);
        if !self.password2.is_empty() && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors
    }
}

fn is_valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Creates an account and returns its id. Usernames are unique; a racing
/// duplicate is reported as the same field error as a pre-existing one.
pub async fn signup(pool: &SqlitePool, input: &SignupInput) -> AppResult<i64> {
    let mut errors = input.validate();
    let username = input.username.trim();

    if !errors.has("username") && account_repo::username_exists(pool, username).await? {
        errors.add("username", MSG_USERNAME_TAKEN);
    }
    errors.into_result().map_err(AppError::Validation)?;

    let password_hash = password::hash_password(&input.password1)?;
    let role = Role::for_signup(input.is_finder);

    let inserted = account_repo::insert_account(
        pool,
        account_repo::NewAccount {
            username,
            email: input.email.trim(),
            password_hash: &password_hash,
            role,
            date_joined: Utc::now(),
        },
    )
    .await;

    match inserted {
        Ok(account_id) => {
            info!("Account {} signed up as {} (id={})", username, role, account_id);
            Ok(account_id)
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let mut errors = FieldErrors::new();
            errors.add("username", MSG_USERNAME_TAKEN);
            Err(AppError::Validation(errors))
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks a username-or-email plus password. Wrong credentials come back as
/// a validation error on the form as a whole.
pub async fn authenticate(pool: &SqlitePool, login: &str, password: &str) -> AppResult<AccountsRow> {
    let mut errors = FieldErrors::new();
    errors.required("username", login);
    errors.required("password", password);
    errors.into_result().map_err(AppError::Validation)?;

    let account = account_repo::find_by_login(pool, login.trim()).await?;
    if let Some(account) = account {
        if password::verify_password(password, &account.password_hash)? {
            return Ok(account);
        }
    }

    debug!("Login rejected for {}", login.trim());
    let mut errors = FieldErrors::new();
    errors.add(NON_FIELD, MSG_BAD_LOGIN);
    Err(AppError::Validation(errors))
}

pub async fn create_session(pool: &SqlitePool, account_id: i64) -> AppResult<String> {
    let now = Utc::now();
    let session_id = Uuid::new_v4().to_string();

    session_repo::delete_expired_for_account(pool, account_id, now).await?;
    session_repo::insert_session(
        pool,
        &session_id,
        account_id,
        now,
        now + Duration::days(SESSION_TTL_DAYS),
    )
    .await?;

    Ok(session_id)
}

/// Returns the account behind a live session; expired sessions are removed.
pub async fn resolve_session(pool: &SqlitePool, session_id: &str) -> AppResult<Option<i64>> {
    let Some(session) = session_repo::load_session(pool, session_id).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        session_repo::delete_session(pool, &session.id).await?;
        return Ok(None);
    }

    Ok(Some(session.account_id))
}

pub async fn end_session(pool: &SqlitePool, session_id: &str) -> AppResult<()> {
    session_repo::delete_session(pool, session_id).await?;
    Ok(())
}
