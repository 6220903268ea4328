use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use crate::database::{interests_repo, opportunity_types_repo};
use crate::error::{AppError, AppResult};
use crate::models::{InterestRow, OpportunityTypeRow};
use crate::services::validation::FieldErrors;

/// Interests every fresh installation starts with, as `(slug, name)`.
pub const DEFAULT_INTERESTS: [(&str, &str); 5] = [
    ("part-time", "Part-time Jobs"),
    ("internships", "Internships"),
    ("projects", "Academic Projects"),
    ("startups", "Startups"),
    ("competitions", "Competitions"),
];

pub const MAX_INTEREST_NAME_LEN: usize = 120;
pub const MAX_SLUG_LEN: usize = 64;
pub const MAX_OPPORTUNITY_TYPE_LEN: usize = 100;

/// One checkbox in a multi-select form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub id: i64,
    pub label: String,
    pub checked: bool,
}

pub fn interest_choices(catalog: &[InterestRow], selected: &[i64]) -> Vec<ChoiceView> {
    catalog
        .iter()
        .map(|i| ChoiceView {
            id: i.id,
            label: i.name.clone(),
            checked: selected.contains(&i.id),
        })
        .collect()
}

pub fn opportunity_choices(catalog: &[OpportunityTypeRow], selected: &[i64]) -> Vec<ChoiceView> {
    catalog
        .iter()
        .map(|o| ChoiceView {
            id: o.id,
            label: o.name.clone(),
            checked: selected.contains(&o.id),
        })
        .collect()
}

/// Lowercases, drops anything but ASCII letters, digits, `_`, `-` and
/// whitespace, then collapses runs of whitespace and hyphens into one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }

    let slug: String = slug
        .trim_matches(|c| c == '-' || c == '_')
        .chars()
        .take(MAX_SLUG_LEN)
        .collect();
    slug.trim_end_matches('-').to_string()
}

/// Seeds the default interests when the catalog is empty. Returns how many
/// rows this call inserted; a concurrent seeder may have won the race.
pub async fn ensure_default_interests(conn: &mut SqliteConnection) -> AppResult<u64> {
    if interests_repo::count_interests(&mut *conn).await? > 0 {
        return Ok(0);
    }
    seed_default_interests(conn).await
}

/// Applies the default seed list unconditionally. Existing rows are kept.
pub async fn seed_default_interests(conn: &mut SqliteConnection) -> AppResult<u64> {
    let inserted = interests_repo::insert_ignoring_conflicts(&mut *conn, &DEFAULT_INTERESTS).await?;
    if inserted > 0 {
        info!("Seeded {} default interests", inserted);
    }
    Ok(inserted)
}

/// Get-or-create by name or slug. The slug is derived from the name when
/// none is given. Returns the row and whether it was created.
pub async fn create_interest(
    pool: &SqlitePool,
    name: &str,
    slug: Option<&str>,
) -> AppResult<(InterestRow, bool)> {
    let name = name.trim();
    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.to_string(),
        None => slugify(name),
    };

    let mut errors = FieldErrors::new();
    errors.required("name", name);
    errors.max_chars("name", name, MAX_INTEREST_NAME_LEN);
    if !name.is_empty() && slug.is_empty() {
        errors.add(
            "slug",
            "Enter a valid \u{201c}slug\u{201d} consisting of letters, numbers, underscores or hyphens.",
        );
    }
    errors.max_chars("slug", &slug, MAX_SLUG_LEN);
    errors.into_result().map_err(AppError::Validation)?;

    if let Some(existing) = interests_repo::find_by_name_or_slug(pool, name, &slug).await? {
        return Ok((existing, false));
    }

    match interests_repo::insert_interest(pool, name, &slug).await {
        Ok(id) => Ok((
            InterestRow {
                id,
                name: name.to_string(),
                slug,
            },
            true,
        )),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let existing = interests_repo::find_by_name_or_slug(pool, name, &slug)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok((existing, false))
        }
        Err(e) => Err(e.into()),
    }
}

/// Renames an interest. A slug that is already set is left untouched; an
/// empty one is derived from the new name.
pub async fn rename_interest(
    pool: &SqlitePool,
    interest_id: i64,
    new_name: &str,
) -> AppResult<Option<InterestRow>> {
    let Some(mut interest) = interests_repo::load_interest(pool, interest_id).await? else {
        return Ok(None);
    };

    let new_name = new_name.trim();
    let mut errors = FieldErrors::new();
    errors.required("name", new_name);
    errors.max_chars("name", new_name, MAX_INTEREST_NAME_LEN);
    errors.into_result().map_err(AppError::Validation)?;

    interest.name = new_name.to_string();
    if interest.slug.is_empty() {
        interest.slug = slugify(new_name);
    }

    interests_repo::update_interest(pool, interest.id, &interest.name, &interest.slug).await?;
    Ok(Some(interest))
}

pub async fn create_opportunity_type(
    pool: &SqlitePool,
    name: &str,
) -> AppResult<(OpportunityTypeRow, bool)> {
    let name = name.trim();
    let mut errors = FieldErrors::new();
    errors.required("name", name);
    errors.max_chars("name", name, MAX_OPPORTUNITY_TYPE_LEN);
    errors.into_result().map_err(AppError::Validation)?;

    if let Some(existing) = opportunity_types_repo::find_by_name(pool, name).await? {
        return Ok((existing, false));
    }

    match opportunity_types_repo::insert_opportunity_type(pool, name).await {
        Ok(id) => Ok((
            OpportunityTypeRow {
                id,
                name: name.to_string(),
            },
            true,
        )),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let existing = opportunity_types_repo::find_by_name(pool, name)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok((existing, false))
        }
        Err(e) => Err(e.into()),
    }
}
