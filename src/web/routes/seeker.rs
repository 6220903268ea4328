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
use crate::services::seeker_service::{
    self, SeekerDashboardView, SeekerProfileInput, SeekerSetupView,
};
use crate::web::middleware::auth::{login_redirect, AuthenticatedUser};
use crate::web::routes::role::ROLE_SELECTION_PATH;
use crate::web::{forms::FormFields, render, render_with_status};

#[derive(Template)]
#[template(path = "seeker_setup.html")]
pub struct SeekerSetupTemplate {
    pub form: SeekerSetupView,
}

#[derive(Template)]
#[template(path = "seeker_dashboard.html")]
pub struct SeekerDashboardTemplate {
    pub dashboard: SeekerDashboardView,
}

pub async fn seeker_setup_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let form = seeker_service::load_setup_view(&pool, auth_user.account_id).await?;
    Ok(render(&SeekerSetupTemplate { form })?.into_response())
}

pub async fn seeker_setup_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let fields = FormFields(fields);
    let input = SeekerProfileInput {
        full_name: fields.text("full_name"),
        email: fields.text("email"),
        university: fields.text("university"),
        skills: fields.text("skills"),
        interests: fields.all("interests"),
    };

    match seeker_service::save_setup(&pool, auth_user.account_id, &input).await {
        Ok(_) => Ok(Redirect::to(Role::Seeker.dashboard_path()).into_response()),
        Err(AppError::Validation(errors)) => {
            let form = seeker_service::invalid_setup_view(&pool, &input, errors).await?;
            render_with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                &SeekerSetupTemplate { form },
            )
        }
        Err(e) => Err(e),
    }
}

pub async fn seeker_dashboard_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(account) = account_repo::load_account(&pool, auth_user.account_id).await? else {
        return Ok(login_redirect(Role::Seeker.dashboard_path()));
    };
    if !account.is_seeker() {
        return Ok(Redirect::to(ROLE_SELECTION_PATH).into_response());
    }

    let dashboard = seeker_service::load_dashboard_view(&pool, &account).await?;
    Ok(render(&SeekerDashboardTemplate { dashboard })?.into_response())
}
