use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use sqlx::SqlitePool;

use crate::database::account_repo;
use crate::error::{AppError, AppResult};
use crate::models::Role;
use crate::services::finder_service::{
    self, FinderDashboardView, FinderProfileInput, FinderSetupView,
};
use crate::web::middleware::auth::{login_redirect, AuthenticatedUser};
use crate::web::routes::role::ROLE_SELECTION_PATH;
use crate::web::{forms::FormFields, render, render_with_status};

#[derive(Template)]
#[template(path = "finder_setup.html")]
pub struct FinderSetupTemplate {
    pub form: FinderSetupView,
}

#[derive(Template)]
#[template(path = "finder_dashboard.html")]
pub struct FinderDashboardTemplate {
    pub dashboard: FinderDashboardView,
}

pub async fn finder_setup_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let form = finder_service::load_setup_view(&pool, auth_user.account_id).await?;
    Ok(render(&FinderSetupTemplate { form })?.into_response())
}

pub async fn finder_setup_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let fields = FormFields(fields);
    let input = FinderProfileInput {
        full_name: fields.text("full_name"),
        email: fields.text("email"),
        university: fields.text("university"),
        organization: fields.text("organization"),
        opportunities: fields.all("opportunities"),
    };

    match finder_service::save_setup(&pool, auth_user.account_id, &input).await {
        Ok(_) => Ok(Redirect::to(Role::Finder.dashboard_path()).into_response()),
        Err(AppError::Validation(errors)) => {
            let form =
                finder_service::invalid_setup_view(&pool, auth_user.account_id, &input, errors)
                    .await?;
            render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                &FinderSetupTemplate { form },
            )
        }
        Err(e) => Err(e),
    }
}

pub async fn finder_dashboard_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(account) = account_repo::load_account(&pool, auth_user.account_id).await? else {
        return Ok(login_redirect(Role::Finder.dashboard_path()));
    };
    if !account.is_finder() {
        return Ok(Redirect::to(ROLE_SELECTION_PATH).into_response());
    }

    let dashboard = finder_service::load_dashboard_view(&pool, &account).await?;
    Ok(render(&FinderDashboardTemplate { dashboard })?.into_response())
}
