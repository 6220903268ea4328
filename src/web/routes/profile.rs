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
use crate::services::account_service::{self, AccountProfileInput, AccountProfileView};
use crate::web::middleware::auth::{login_redirect, AuthenticatedUser};
use crate::web::{forms::FormFields, render, render_with_status};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub profile: AccountProfileView,
}

pub async fn profile_page(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
) -> AppResult<Response> {
    let Some(profile) = account_service::load_profile_view(&pool, auth_user.account_id).await? else {
        return Ok(login_redirect("/profile/"));
    };

    Ok(render(&ProfileTemplate { profile })?.into_response())
}

pub async fn profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(pool): State<SqlitePool>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let fields = FormFields(fields);
    let input = AccountProfileInput {
        bio: fields.get("bio").map(str::to_string),
        skills: fields.get("skills").map(str::to_string),
        is_finder: fields.checked("is_finder"),
        is_seeker: fields.checked("is_seeker"),
        profile_picture: fields.get("profile_picture").map(str::to_string),
        resume: fields.get("resume").map(str::to_string),
    };

    match account_service::update_profile(&pool, auth_user.account_id, &input).await {
        Ok(_) => Ok(Redirect::to("/profile/").into_response()),
        Err(AppError::Validation(errors)) => {
            let Some(account) = account_repo::load_account(&pool, auth_user.account_id).await?
            else {
                return Ok(login_redirect("/profile/"));
            };
            let mut profile = account_service::build_profile_view(&account, errors.errors);
            if let Some(bio) = input.bio {
                profile.bio = bio;
            }
            if let Some(skills) = input.skills {
                profile.skills = skills;
            }
            render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &ProfileTemplate { profile })
        }
        Err(e) => Err(e),
    }
}
