use sqlx::{Executor, QueryBuilder, Sqlite};

use crate::models::InterestRow;

const SQL_COUNT_INTERESTS: &str = r#"
SELECT COUNT(*) FROM interests
"#;

const SQL_LIST_INTERESTS: &str = r#"
SELECT
  id,
  name,
  slug
FROM interests
ORDER BY name ASC
"#;

const SQL_LOAD_INTEREST: &str = r#"
SELECT
  id,
  name,
  slug
FROM interests
WHERE id = ?1
LIMIT 1
"#;

const SQL_FIND_INTEREST: &str = r#"
SELECT
  id,
  name,
  slug
FROM interests
WHERE name = ?1 OR slug = ?2
ORDER BY id ASC
LIMIT 1
"#;

const SQL_INSERT_INTEREST: &str = r#"
INSERT INTO interests (name, slug) VALUES (?1, ?2)
RETURNING id
"#;

const SQL_UPDATE_INTEREST: &str = r#"
UPDATE interests SET name = ?2, slug = ?3 WHERE id = ?1
"#;

const SQL_LIST_FOR_SEEKER_PROFILE: &str = r#"
SELECT
  i.id,
  i.name,
  i.slug
FROM interests i
JOIN seeker_profile_interests spi ON spi.interest_id = i.id
WHERE spi.seeker_profile_id = ?1
ORDER BY i.name ASC
"#;

pub async fn count_interests<'e, E>(exec: E) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_COUNT_INTERESTS)
        .fetch_one(exec)
        .await
}

pub async fn list_all<'e, E>(exec: E) -> sqlx::Result<Vec<InterestRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, InterestRow>(SQL_LIST_INTERESTS)
        .fetch_all(exec)
        .await
}

pub async fn load_interest<'e, E>(exec: E, interest_id: i64) -> sqlx::Result<Option<InterestRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, InterestRow>(SQL_LOAD_INTEREST)
        .bind(interest_id)
        .fetch_optional(exec)
        .await
}

pub async fn find_by_name_or_slug<'e, E>(
    exec: E,
    name: &str,
    slug: &str,
) -> sqlx::Result<Option<InterestRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, InterestRow>(SQL_FIND_INTEREST)
        .bind(name)
        .bind(slug)
        .fetch_optional(exec)
        .await
}

pub async fn insert_interest<'e, E>(exec: E, name: &str, slug: &str) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_INSERT_INTEREST)
        .bind(name)
        .bind(slug)
        .fetch_one(exec)
        .await
}

pub async fn update_interest<'e, E>(
    exec: E,
    interest_id: i64,
    name: &str,
    slug: &str,
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query(SQL_UPDATE_INTEREST)
        .bind(interest_id)
        .bind(name)
        .bind(slug)
        .execute(exec)
        .await?;
    Ok(res.rows_affected())
}

/// Inserts `(slug, name)` pairs in one statement. Rows clashing with an
/// existing name or slug are skipped, so concurrent callers converge.
pub async fn insert_ignoring_conflicts<'e, E>(
    exec: E,
    entries: &[(&str, &str)],
) -> sqlx::Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    if entries.is_empty() {
        return Ok(0);
    }

    let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO interests (slug, name) ");
    qb.push_values(entries.iter(), |mut row, (slug, name)| {
        row.push_bind(*slug).push_bind(*name);
    });
    qb.push(" ON CONFLICT DO NOTHING");

    let res = qb.build().execute(exec).await?;
    Ok(res.rows_affected())
}

pub async fn list_for_seeker_profile<'e, E>(
    exec: E,
    seeker_profile_id: i64,
) -> sqlx::Result<Vec<InterestRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, InterestRow>(SQL_LIST_FOR_SEEKER_PROFILE)
        .bind(seeker_profile_id)
        .fetch_all(exec)
        .await
}
