use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::account_repo;
use crate::error::AppResult;
use crate::models::Role;

/// Applies a role selection. Unknown tokens change nothing and yield `None`;
/// an existing profile of the other role is left in place.
pub async fn select_role(pool: &SqlitePool, account_id: i64, token: &str) -> AppResult<Option<Role>> {
    let Some(role) = Role::from_selection(token) else {
        debug!("Ignoring unknown role token {:?} for account {}", token, account_id);
        return Ok(None);
    };

    account_repo::update_role(pool, account_id, role).await?;
    info!("Account {} selected role {}", account_id, role);
    Ok(Some(role))
}
