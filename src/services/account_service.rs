use sqlx::SqlitePool;

use crate::database::account_repo;
use crate::error::{AppError, AppResult};
use crate::models::{AccountsRow, Role};
use crate::services::validation::{FieldError, FieldErrors};

pub const MAX_SKILLS_LEN: usize = 512;
pub const MAX_REFERENCE_LEN: usize = 255;

pub struct AccountProfileView {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub skills: String,
    pub role_label: String,
    pub is_seeker: bool,
    pub is_finder: bool,
    pub profile_picture: Option<String>,
    pub resume: Option<String>,
    pub errors: Vec<FieldError>,
}

/// Submitted `/profile/` form. `None` means the field was not posted.
#[derive(Debug, Clone, Default)]
pub struct AccountProfileInput {
    pub bio: Option<String>,
    pub skills: Option<String>,
    pub is_finder: bool,
    pub is_seeker: bool,
    pub profile_picture: Option<String>,
    pub resume: Option<String>,
}

pub fn build_profile_view(account: &AccountsRow, errors: Vec<FieldError>) -> AccountProfileView {
    AccountProfileView {
        username: account.username.clone(),
        email: account.email.clone(),
        bio: account.bio.clone(),
        skills: account.skills.clone(),
        role_label: account.role.label().to_string(),
        is_seeker: account.is_seeker(),
        is_finder: account.is_finder(),
        profile_picture: account.profile_picture.clone(),
        resume: account.resume.clone(),
        errors,
    }
}

pub async fn load_profile_view(
    pool: &SqlitePool,
    account_id: i64,
) -> AppResult<Option<AccountProfileView>> {
    let account = account_repo::load_account(pool, account_id).await?;
    Ok(account.map(|a| build_profile_view(&a, Vec::new())))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn update_profile(
    pool: &SqlitePool,
    account_id: i64,
    input: &AccountProfileInput,
) -> AppResult<Role> {
    let account = account_repo::load_account(pool, account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let bio = input.bio.as_deref().unwrap_or(&account.bio);
    let skills = input.skills.as_deref().unwrap_or(&account.skills);
    let profile_picture = non_empty(&input.profile_picture);
    let resume = non_empty(&input.resume);

    let mut errors = FieldErrors::new();
    errors.max_chars("skills", skills, MAX_SKILLS_LEN);
    if let Some(r) = profile_picture {
        errors.max_chars("profile_picture", r, MAX_REFERENCE_LEN);
    }
    if let Some(r) = resume {
        errors.max_chars("resume", r, MAX_REFERENCE_LEN);
    }
    let role = Role::from_flags(input.is_finder, input.is_seeker);
    if role.is_none() {
        errors.add(
            "role",
            "An account can be a talent seeker or a talent finder, not both.",
        );
    }
    errors.into_result().map_err(AppError::Validation)?;
    let role = role.unwrap_or(account.role);

    account_repo::update_profile(
        pool,
        account_id,
        account_repo::AccountProfileUpdate {
            bio,
            skills,
            role,
            profile_picture,
            resume,
        },
    )
    .await?;

    Ok(role)
}
