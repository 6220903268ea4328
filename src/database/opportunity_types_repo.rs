use sqlx::{Executor, Sqlite};

use crate::models::OpportunityTypeRow;

const SQL_LIST_OPPORTUNITY_TYPES: &str = r#"
SELECT
  id,
  name
FROM opportunity_types
ORDER BY name ASC
"#;

const SQL_FIND_BY_NAME: &str = r#"
SELECT
  id,
  name
FROM opportunity_types
WHERE name = ?1
LIMIT 1
"#;

const SQL_INSERT_OPPORTUNITY_TYPE: &str = r#"
INSERT INTO opportunity_types (name) VALUES (?1)
RETURNING id
"#;

const SQL_LIST_FOR_FINDER_PROFILE: &str = r#"
SELECT
  o.id,
  o.name
FROM opportunity_types o
JOIN finder_profile_opportunities fpo ON fpo.opportunity_type_id = o.id
WHERE fpo.finder_profile_id = ?1
ORDER BY o.name ASC
"#;

pub async fn list_all<'e, E>(exec: E) -> sqlx::Result<Vec<OpportunityTypeRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, OpportunityTypeRow>(SQL_LIST_OPPORTUNITY_TYPES)
        .fetch_all(exec)
        .await
}

pub async fn find_by_name<'e, E>(exec: E, name: &str) -> sqlx::Result<Option<OpportunityTypeRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, OpportunityTypeRow>(SQL_FIND_BY_NAME)
        .bind(name)
        .fetch_optional(exec)
        .await
}

pub async fn insert_opportunity_type<'e, E>(exec: E, name: &str) -> sqlx::Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, i64>(SQL_INSERT_OPPORTUNITY_TYPE)
        .bind(name)
        .fetch_one(exec)
        .await
}

pub async fn list_for_finder_profile<'e, E>(
    exec: E,
    finder_profile_id: i64,
) -> sqlx::Result<Vec<OpportunityTypeRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, OpportunityTypeRow>(SQL_LIST_FOR_FINDER_PROFILE)
        .bind(finder_profile_id)
        .fetch_all(exec)
        .await
}
