use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::{account_repo, finder_profile_repo, opportunity_types_repo};
use crate::error::{AppError, AppResult};
use crate::models::{AccountsRow, FinderProfilesRow, Role};
use crate::services::catalog_service::{self, ChoiceView};
use crate::services::validation::{self, FieldError, FieldErrors};

pub const MAX_FIELD_LEN: usize = 255;

#[derive(Debug, Clone, Default)]
pub struct FinderProfileInput {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub organization: String,
    pub opportunities: Vec<String>,
}

impl FinderProfileInput {
    fn validate(&self, catalog_ids: &[i64]) -> (Vec<i64>, FieldErrors) {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("university", &self.university),
            ("organization", &self.organization),
        ] {
            errors.required(field, value);
            errors.max_chars(field, value.trim(), MAX_FIELD_LEN);
        }
        errors.email("email", &self.email);
        let ids =
            validation::parse_choices(&mut errors, "opportunities", &self.opportunities, catalog_ids);
        (ids, errors)
    }
}

pub struct FinderSetupView {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub organization: String,
    pub choices: Vec<ChoiceView>,
    pub has_profile: bool,
    pub errors: Vec<FieldError>,
}

pub struct FinderProfileSummary {
    pub full_name: String,
    pub email: String,
    pub university: String,
    pub organization: String,
    pub opportunities: Vec<String>,
}

pub struct FinderDashboardView {
    pub username: String,
    pub profile: Option<FinderProfileSummary>,
}

pub async fn load_setup_view(pool: &SqlitePool, account_id: i64) -> AppResult<FinderSetupView> {
    let catalog = opportunity_types_repo::list_all(pool).await?;
    let profile = finder_profile_repo::load_by_account(pool, account_id).await?;

    let Some(profile) = profile else {
        return Ok(FinderSetupView {
            full_name: String::new(),
            email: String::new(),
            university: String::new(),
            organization: String::new(),
            choices: catalog_service::opportunity_choices(&catalog, &[]),
            has_profile: false,
            errors: Vec::new(),
        });
    };

    let selected: Vec<i64> = opportunity_types_repo::list_for_finder_profile(pool, profile.id)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    Ok(FinderSetupView {
        full_name: profile.full_name,
        email: profile.email,
        university: profile.university,
        organization: profile.organization,
        choices: catalog_service::opportunity_choices(&catalog, &selected),
        has_profile: true,
        errors: Vec::new(),
    })
}

pub async fn invalid_setup_view(
    pool: &SqlitePool,
    account_id: i64,
    input: &FinderProfileInput,
    errors: FieldErrors,
) -> AppResult<FinderSetupView> {
    let catalog = opportunity_types_repo::list_all(pool).await?;
    let has_profile = finder_profile_repo::count_for_account(pool, account_id).await? > 0;
    let selected: Vec<i64> = input
        .opportunities
        .iter()
        .filter_map(|v| v.trim().parse().ok())
        .collect();

    Ok(FinderSetupView {
        full_name: input.full_name.clone(),
        email: input.email.clone(),
        university: input.university.clone(),
        organization: input.organization.clone(),
        choices: catalog_service::opportunity_choices(&catalog, &selected),
        has_profile,
        errors: errors.errors,
    })
}

/// Validates and upserts the finder profile, its opportunity types and the
/// finder role in one transaction. Resubmitting updates the same profile.
pub async fn save_setup(
    pool: &SqlitePool,
    account_id: i64,
    input: &FinderProfileInput,
) -> AppResult<FinderProfilesRow> {
    let catalog_ids: Vec<i64> = opportunity_types_repo::list_all(pool)
        .await?
        .into_iter()
        .map(|o| o.id)
        .collect();

    let (type_ids, errors) = input.validate(&catalog_ids);
    errors.into_result().map_err(AppError::Validation)?;

    let mut tx = pool.begin().await?;

    let profile_id = finder_profile_repo::upsert(
        &mut *tx,
        account_id,
        finder_profile_repo::FinderProfileUpsert {
            full_name: input.full_name.trim(),
            email: input.email.trim(),
            university: input.university.trim(),
            organization: input.organization.trim(),
            now: Utc::now(),
        },
    )
    .await?;
    finder_profile_repo::clear_opportunities(&mut *tx, profile_id).await?;
    finder_profile_repo::insert_opportunities(&mut *tx, profile_id, &type_ids).await?;
    account_repo::update_role(&mut *tx, account_id, Role::Finder).await?;

    let saved = finder_profile_repo::load_by_account(&mut *tx, account_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    tx.commit().await?;

    info!(
        "Saved finder profile {} for account {} ({})",
        saved.id, account_id, saved.organization
    );
    Ok(saved)
}

/// A missing profile is not an error; the dashboard shows a prompt instead.
pub async fn load_dashboard_view(
    pool: &SqlitePool,
    account: &AccountsRow,
) -> AppResult<FinderDashboardView> {
    let profile = match finder_profile_repo::load_by_account(pool, account.id).await? {
        Some(p) => {
            let opportunities = opportunity_types_repo::list_for_finder_profile(pool, p.id)
                .await?
                .into_iter()
                .map(|o| o.name)
                .collect();
            Some(FinderProfileSummary {
                full_name: p.full_name,
                email: p.email,
                university: p.university,
                organization: p.organization,
                opportunities,
            })
        }
        None => None,
    };

    Ok(FinderDashboardView {
        username: account.display_name().to_string(),
        profile,
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
                username: "jo",
                email: "jo@acme.io",
                password_hash: "x",
                role: Role::Seeker,
                date_joined: Utc::now(),
            },
        )
        .await
        .unwrap();
        (pool, id)
    }

    fn acme_input() -> FinderProfileInput {
        FinderProfileInput {
            full_name: "Jo Smith".to_string(),
            email: "jo@acme.io".to_string(),
            university: "Stanford".to_string(),
            organization: "Acme".to_string(),
            opportunities: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_resubmit_updates_single_profile() {
        let (pool, id) = pool_with_account().await;
        let (internship, _) = catalog_service::create_opportunity_type(&pool, "Internship")
            .await
            .unwrap();
        let (research, _) = catalog_service::create_opportunity_type(&pool, "Research")
            .await
            .unwrap();

        let mut input = acme_input();
        input.opportunities = vec![internship.id.to_string(), research.id.to_string()];
        let first = save_setup(&pool, id, &input).await.unwrap();

        input.organization = "Acme Labs".to_string();
        input.opportunities = vec![research.id.to_string()];
        let second = save_setup(&pool, id, &input).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.organization, "Acme Labs");
        assert_eq!(
            finder_profile_repo::count_for_account(&pool, id).await.unwrap(),
            1
        );

        let types = opportunity_types_repo::list_for_finder_profile(&pool, second.id)
            .await
            .unwrap();
        assert_eq!(types, vec![research]);

        let account = account_repo::load_account(&pool, id).await.unwrap().unwrap();
        assert_eq!(account.role, Role::Finder);
    }

    #[tokio::test]
    async fn test_required_fields() {
        let (pool, id) = pool_with_account().await;
        let input = FinderProfileInput {
            organization: "Acme".to_string(),
            ..Default::default()
        };

        let err = save_setup(&pool, id, &input).await.unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.has("full_name"));
        assert!(errors.has("email"));
        assert!(errors.has("university"));
        assert!(!errors.has("organization"));
        assert_eq!(
            finder_profile_repo::count_for_account(&pool, id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_dashboard_tolerates_missing_profile() {
        let (pool, id) = pool_with_account().await;
        let account = account_repo::load_account(&pool, id).await.unwrap().unwrap();

        let view = load_dashboard_view(&pool, &account).await.unwrap();
        assert!(view.profile.is_none());

        save_setup(&pool, id, &acme_input()).await.unwrap();
        let view = load_dashboard_view(&pool, &account).await.unwrap();
        assert_eq!(view.profile.unwrap().organization, "Acme");
    }
}
