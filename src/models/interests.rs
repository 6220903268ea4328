#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct InterestRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
