use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::database::{account_repo, interests_repo, seeker_profile_repo};
use crate::error::{AppError, AppResult};
use crate::models::{AccountsRow, Role, SeekerProfilesRow};
use crate::services::catalog_service::{self, ChoiceView};
use crate::services::validation::{self, FieldError, FieldErrors};

pub const MAX_FULL_NAME_LEN: usize = 200;
pub const MAX_UNIVERSITY_LEN: usize = 255;

#[derive(Debug, Clone, Default)]
pub struct SeekerProfileInput {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub skills: String,
    /// Raw checkbox values; parsed and checked against the catalog on save.
    pub interests: Vec<String>,
}

impl SeekerProfileInput {
    fn validate(&self, catalog_ids: &[i64]) -> (Vec<i64>, FieldErrors) {
        let mut errors = FieldErrors::new();
        errors.max_chars("full_name", self.full_name.trim(), MAX_FULL_NAME_LEN);
        errors.email("email", &self.email);
        errors.max_chars("university", self.university.trim(), MAX_UNIVERSITY_LEN);
        let ids = validation::parse_choices(&mut errors, "interests", &self.interests, catalog_ids);
        (ids, errors)
    }
}

pub struct SeekerSetupView {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub skills: String,
    pub choices: Vec<ChoiceView>,
    pub errors: Vec<FieldError>,
}

pub struct SeekerDashboardView {
    pub username: String,
    pub full_name: Option<String>,
    pub university: Option<String>,
    pub interests: Vec<String>,
}

/// Returns the account's profile, creating an empty one on first use.
/// Safe to call repeatedly: the unique account key prevents duplicates.
pub async fn get_or_create_profile(
    conn: &mut SqliteConnection,
    account_id: i64,
) -> AppResult<SeekerProfilesRow> {
    let created = seeker_profile_repo::insert_if_missing(&mut *conn, account_id, Utc::now()).await?;
    if created > 0 {
        info!("Created seeker profile for account {}", account_id);
    }

    let profile = seeker_profile_repo::load_by_account(&mut *conn, account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(profile)
}

pub async fn load_setup_view(pool: &SqlitePool, account_id: i64) -> AppResult<SeekerSetupView> {
    let mut conn = pool.acquire().await?;

    let profile = get_or_create_profile(&mut conn, account_id).await?;
    catalog_service::ensure_default_interests(&mut conn).await?;

    let catalog = interests_repo::list_all(&mut *conn).await?;
    let selected: Vec<i64> = interests_repo::list_for_seeker_profile(&mut *conn, profile.id)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    Ok(SeekerSetupView {
        full_name: profile.full_name,
        email: profile.email,
        university: profile.university,
        skills: profile.skills,
        choices: catalog_service::interest_choices(&catalog, &selected),
        errors: Vec::new(),
    })
}

/// Rebuilds the form from rejected input so the user sees what they sent.
pub async fn invalid_setup_view(
    pool: &SqlitePool,
    input: &SeekerProfileInput,
    errors: FieldErrors,
) -> AppResult<SeekerSetupView> {
    let catalog = interests_repo::list_all(pool).await?;
    let selected: Vec<i64> = input
        .interests
        .iter()
        .filter_map(|v| v.trim().parse().ok())
        .collect();

    Ok(SeekerSetupView {
        full_name: input.full_name.clone(),
        email: input.email.clone(),
        university: input.university.clone(),
        skills: input.skills.clone(),
        choices: catalog_service::interest_choices(&catalog, &selected),
        errors: errors.errors,
    })
}

/// Validates and stores the seeker profile, its interest set and the seeker
/// role in one transaction. Nothing is written when validation fails.
pub async fn save_setup(
    pool: &SqlitePool,
    account_id: i64,
    input: &SeekerProfileInput,
) -> AppResult<SeekerProfilesRow> {
    let catalog_ids: Vec<i64> = interests_repo::list_all(pool)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();

    let (interest_ids, errors) = input.validate(&catalog_ids);
    errors.into_result().map_err(AppError::Validation)?;

    let mut tx = pool.begin().await?;

    let profile = get_or_create_profile(&mut tx, account_id).await?;
    seeker_profile_repo::update_fields(
        &mut *tx,
        profile.id,
        seeker_profile_repo::SeekerProfileUpdate {
            full_name: input.full_name.trim(),
            email: input.email.trim(),
            university: input.university.trim(),
            skills: input.skills.trim(),
            updated_at: Utc::now(),
        },
    )
    .await?;
    seeker_profile_repo::clear_interests(&mut *tx, profile.id).await?;
    seeker_profile_repo::insert_interests(&mut *tx, profile.id, &interest_ids).await?;
    account_repo::update_role(&mut *tx, account_id, Role::Seeker).await?;

    let saved = seeker_profile_repo::load_by_account(&mut *tx, account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;

    info!(
        "Saved seeker profile {} for account {} with {} interests",
        saved.id,
        account_id,
        interest_ids.len()
    );
    Ok(saved)
}

pub async fn load_dashboard_view(
    pool: &SqlitePool,
    account: &AccountsRow,
) -> AppResult<SeekerDashboardView> {
    let profile = seeker_profile_repo::load_by_account(pool, account.id).await?;

    let interests = match &profile {
        Some(p) => interests_repo::list_for_seeker_profile(pool, p.id)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect(),
        None => Vec::new(),
    };

    let non_blank = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

    Ok(SeekerDashboardView {
        username: account.display_name().to_string(),
        full_name: profile.as_ref().and_then(|p| non_blank(&p.full_name)),
        university: profile.as_ref().and_then(|p| non_blank(&p.university)),
        interests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;

    async fn pool_with_account() -> (SqlitePool, i64) {
        let pool = database::connect_in_memory().await.unwrap();
        database::migrate(&pool).await.unwrap();
        let id = account_repo::insert_account(
            &pool,
            account_repo::NewAccount {
                username: "robin",
                email: "robin@uni.edu",
                password_hash: "x",
                role: Role::Finder,
                date_joined: Utc::now(),
            },
        )
        .await
        .unwrap();
        (pool, id)
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (pool, id) = pool_with_account().await;
        let mut conn = pool.acquire().await.unwrap();

        let first = get_or_create_profile(&mut conn, id).await.unwrap();
        let second = get_or_create_profile(&mut conn, id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            seeker_profile_repo::count_for_account(&mut *conn, id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_setup_view_seeds_catalog() {
        let (pool, id) = pool_with_account().await;

        let view = load_setup_view(&pool, id).await.unwrap();
        let labels: Vec<&str> = view.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Academic Projects",
                "Competitions",
                "Internships",
                "Part-time Jobs",
                "Startups"
            ]
        );
        assert!(view.choices.iter().all(|c| !c.checked));
    }

    #[tokio::test]
    async fn test_save_persists_exact_interest_subset() {
        let (pool, id) = pool_with_account().await;
        let view = load_setup_view(&pool, id).await.unwrap();
        let picked: Vec<i64> = view.choices.iter().take(2).map(|c| c.id).collect();

        let input = SeekerProfileInput {
            full_name: "Robin Lee".to_string(),
            email: "robin@uni.edu".to_string(),
            university: "MIT".to_string(),
            skills: "Python".to_string(),
            interests: picked.iter().rev().map(|i| i.to_string()).collect(),
        };
        let profile = save_setup(&pool, id, &input).await.unwrap();

        let mut stored: Vec<i64> = interests_repo::list_for_seeker_profile(&pool, profile.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        stored.sort();
        let mut expected = picked.clone();
        expected.sort();
        assert_eq!(stored, expected);

        // Narrowing the selection replaces the set.
        let input = SeekerProfileInput {
            interests: vec![picked[0].to_string()],
            ..input
        };
        save_setup(&pool, id, &input).await.unwrap();
        let stored = interests_repo::list_for_seeker_profile(&pool, profile.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, picked[0]);

        let account = account_repo::load_account(&pool, id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::Seeker);
    }

    #[tokio::test]
    async fn test_invalid_submit_writes_nothing() {
        let (pool, id) = pool_with_account().await;

        let input = SeekerProfileInput {
            full_name: "Robin".to_string(),
            email: "not-an-email".to_string(),
            interests: vec!["999".to_string()],
            ..Default::default()
        };
        let err = save_setup(&pool, id, &input).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.has("email"));
        assert!(errors.has("interests"));

        assert_eq!(
            seeker_profile_repo::count_for_account(&pool, id).await.unwrap(),
            0
        );
        let account = account_repo::load_account(&pool, id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::Finder);
    }

    #[tokio::test]
    async fn test_empty_subset_is_allowed() {
        let (pool, id) = pool_with_account().await;
        let profile = save_setup(&pool, id, &SeekerProfileInput::default())
            .await
            .unwrap();
        assert!(interests_repo::list_for_seeker_profile(&pool, profile.id)
            .await
            .unwrap()
            .is_empty());
    }
}
