#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OpportunityTypeRow {
    pub id: i64,
    pub name: String,
}
