use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use sqlx::SqlitePool;

use crate::database::account_repo;
use crate::error::AppResult;
use crate::services::role_service;
use crate::web::middleware::auth::{login_redirect, AuthenticatedUser};
use crate::web::render;

pub const ROLE_SELECTION_PATH: &str = "/role-selection/";

#[derive(Template)]
#[template(path = "role_selection.html")]
pub struct RoleSelectionTemplate {
    pub username: String,
    pub role_label: String,
    pub is_seeker: bool,
    pub is_finder: bool,
}

pub async fn role_selection_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(account) = account_repo::load_account(&pool, auth_user.account_id).await? else {
        return Ok(login_redirect(ROLE_SELECTION_PATH));
    };

    let template = RoleSelectionTemplate {
        username: account.display_name().to_string(),
        role_label: account.role.label().to_string(),
        is_seeker: account.is_seeker(),
        is_finder: account.is_finder(),
    };
    Ok(render(&template)?.into_response())
}

pub async fn set_role_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(role): Path<String>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let target = match role_service::select_role(&pool, auth_user.account_id, &role).await? {
        Some(role) => role.setup_path(),
        None => ROLE_SELECTION_PATH,
    };
    Ok(Redirect::to(target).into_response())
}
