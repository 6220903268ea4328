use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};
use sqlx::SqlitePool;
use tracing::warn;

use crate::services::auth_service;

pub const SESSION_COOKIE: &str = "session_id";
pub const LOGIN_PATH: &str = "/login/";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub account_id: i64,
}

pub fn session_id_from_headers(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|hv| hv.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn session_cookie(session_id: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(cookie::time::Duration::days(auth_service::SESSION_TTL_DAYS));
    cookie
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.make_removal();
    cookie
}

pub fn login_redirect(next: &str) -> Response {
    let target = format!("{}?next={}", LOGIN_PATH, urlencoding::encode(next));
    Redirect::to(&target).into_response()
}

pub async fn require_auth(
    State(pool): State<SqlitePool>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let Some(session_id) = session_id_from_headers(request.headers()) else {
        return login_redirect(&path);
    };

    match auth_service::resolve_session(&pool, &session_id).await {
        Ok(Some(account_id)) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser { account_id });
            next.run(request).await
        }
        Ok(None) => login_redirect(&path),
        Err(e) => {
            warn!("Session lookup failed: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::*;

    #[test]
    fn test_session_id_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_id=abc-123; other=1"),
        );
        assert_eq!(session_id_from_headers(&headers).as_deref(), Some("abc-123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session_id="));
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_login_redirect_encodes_next() {
        let resp = login_redirect("/profile/?a=1&b=2");
        assert_eq!(resp.status(), axum::http::StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers()[header::LOCATION],
            "/login/?next=%2Fprofile%2F%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_removal_cookie_expires() {
        let cookie = removal_cookie().to_string();
        assert!(cookie.starts_with("session_id=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
