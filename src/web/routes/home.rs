use askama::Template;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use sqlx::SqlitePool;

use crate::error::AppResult;
use crate::services::auth_service;
use crate::web::middleware::auth::session_id_from_headers;
use crate::web::render;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub logged_in: bool,
}

pub async fn index_handler(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let logged_in = match session_id_from_headers(&headers) {
        Some(session_id) => auth_service::resolve_session(&pool, &session_id)
            .await?
            .is_some(),
        None => false,
    };

    Ok(render(&IndexTemplate { logged_in })?.into_response())
}
