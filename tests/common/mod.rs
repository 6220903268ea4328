#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use sqlx::SqlitePool;
use tower::ServiceExt;

use campusconnect::database::{self, account_repo};
use campusconnect::models::AccountsRow;
use campusconnect::web;

pub const PASSWORD: &str = "campus-pass-1";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// `name=value` of the session cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter(|v| v.starts_with("session_id="))
            .map(|v| v.split(';').next().unwrap_or("").to_string())
            .next()
    }
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = database::connect_in_memory().await.unwrap();
    database::migrate(&pool).await.unwrap();
    (web::router(pool.clone()), pool)
}

pub fn form_body(fields: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}

pub async fn send(router: &Router, req: Request<Body>) -> TestResponse {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).to_string(),
    }
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_form(
    router: &Router,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
) -> TestResponse {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(router, builder.body(Body::from(form_body(fields))).unwrap()).await
}

/// Signs up `username` and returns the session cookie.
pub async fn signup(router: &Router, username: &str, as_finder: bool) -> String {
    let email = format!("{}@uni.edu", username);
    let mut fields = vec![
        ("username", username),
        ("email", email.as_str()),
        ("password1", PASSWORD),
        ("password2", PASSWORD),
    ];
    if as_finder {
        fields.push(("is_finder", "on"));
    }

    let resp = post_form(router, "/signup/", None, &fields).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER, "signup failed: {}", resp.body);
    assert_eq!(resp.location(), "/role-selection/");
    resp.session_cookie().expect("signup sets a session cookie")
}

pub async fn account(pool: &SqlitePool, username: &str) -> AccountsRow {
    account_repo::find_by_login(pool, username)
        .await
        .unwrap()
        .expect("account exists")
}
