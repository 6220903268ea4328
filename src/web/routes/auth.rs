use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::services::auth_service::{self, SignupInput};
use crate::services::validation::FieldError;
use crate::web::middleware::auth::{removal_cookie, session_cookie, session_id_from_headers};
use crate::web::{forms::FormFields, render, render_with_status, sanitize_return_to};

const AFTER_LOGIN: &str = "/role-selection/";

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub username: String,
    pub email: String,
    pub is_finder: bool,
    pub errors: Vec<FieldError>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub next: String,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn redirect_with_cookie(target: &str, cookie: Cookie<'_>) -> Response {
    let mut response = Redirect::to(target).into_response();
    if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

pub async fn signup_page() -> AppResult<Response> {
    let template = SignupTemplate {
        username: String::new(),
        email: String::new(),
        is_finder: false,
        errors: Vec::new(),
    };
    Ok(render(&template)?.into_response())
}

pub async fn signup_handler(
    State(pool): State<SqlitePool>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let fields = FormFields(fields);
    let input = SignupInput {
        username: fields.text("username"),
        email: fields.text("email"),
        password1: fields.text("password1"),
        password2: fields.text("password2"),
        is_finder: fields.checked("is_finder"),
    };

    let account_id = match auth_service::signup(&pool, &input).await {
        Ok(id) => id,
        Err(AppError::Validation(errors)) => {
            let template = SignupTemplate {
                username: input.username,
                email: input.email,
                is_finder: input.is_finder,
                errors: errors.errors,
            };
            return render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &template);
        }
        Err(e) => return Err(e),
    };

    let session_id = auth_service::create_session(&pool, account_id).await?;
    Ok(redirect_with_cookie(AFTER_LOGIN, session_cookie(&session_id)))
}

pub async fn login_page(Query(query): Query<LoginQuery>) -> AppResult<Response> {
    let template = LoginTemplate {
        username: String::new(),
        next: query.next.unwrap_or_default(),
        errors: Vec::new(),
    };
    Ok(render(&template)?.into_response())
}

pub async fn login_handler(
    State(pool): State<SqlitePool>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let fields = FormFields(fields);
    let login = fields.text("username");
    let next = fields.text("next");

    let account = match auth_service::authenticate(&pool, &login, &fields.text("password")).await {
        Ok(account) => account,
        Err(AppError::Validation(errors)) => {
            let template = LoginTemplate {
                username: login,
                next,
                errors: errors.errors,
            };
            return render_with_status(StatusCode::UNPROCESSABLE_ENTITY, &template);
        }
        Err(e) => return Err(e),
    };

    let session_id = auth_service::create_session(&pool, account.id).await?;
    info!("Account {} logged in", account.username);

    let target = sanitize_return_to(&next).unwrap_or(AFTER_LOGIN);
    Ok(redirect_with_cookie(target, session_cookie(&session_id)))
}

pub async fn logout_handler(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if let Some(session_id) = session_id_from_headers(&headers) {
        auth_service::end_session(&pool, &session_id).await?;
    }
    Ok(redirect_with_cookie("/", removal_cookie()))
}
