use askama::Template;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, get_service, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppResult;
use crate::web::middleware::auth as auth_middleware;
use crate::web::routes::{auth, finder, home, profile, role, seeker};

pub mod forms;
pub mod middleware;
pub mod routes;

pub fn router(pool: SqlitePool) -> Router {
    let protected_routes = Router::new()
        .route(
            "/profile/",
            get(profile::profile_page).post(profile::profile_handler),
        )
        .route("/role-selection/", get(role::role_selection_page))
        .route("/set-role/:role/", post(role::set_role_handler))
        .route(
            "/seeker-setup/",
            get(seeker::seeker_setup_page).post(seeker::seeker_setup_handler),
        )
        .route(
            "/finder-setup/",
            get(finder::finder_setup_page).post(finder::finder_setup_handler),
        )
        .route("/seeker-dashboard/", get(seeker::seeker_dashboard_handler))
        .route("/finder-dashboard/", get(finder::finder_dashboard_handler))
        .layer(axum::middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    Router::new()
        // Public routes
        .route("/", get(home::index_handler))
        .route("/signup/", get(auth::signup_page).post(auth::signup_handler))
        .route("/login/", get(auth::login_page).post(auth::login_handler))
        .route("/logout/", get(auth::logout_handler))
        // Protected routes
        .merge(protected_routes)
        .nest_service("/static", get_service(ServeDir::new("static")))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(pool)
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}

/// Renders a form page with the given status, used to redisplay invalid input.
pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> AppResult<Response> {
    Ok((status, render(template)?).into_response())
}

/// Accepts only same-site absolute paths for post-login redirects. Browsers
/// drop tabs and newlines from URLs, so any whitespace or control byte
/// disqualifies the value along with non-ASCII input.
pub fn sanitize_return_to(value: &str) -> Option<&str> {
    let v = value.trim();
    if !v.starts_with('/') || !v.bytes().all(|b| b.is_ascii_graphic()) {
        return None;
    }
    if v.starts_with("//") || v.contains("://") || v.contains('\\') {
        return None;
    }
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_return_to() {
        assert_eq!(sanitize_return_to("/finder-dashboard/"), Some("/finder-dashboard/"));
        assert_eq!(sanitize_return_to(" /profile/ "), Some("/profile/"));
        assert_eq!(sanitize_return_to("//evil.example"), None);
        assert_eq!(sanitize_return_to("https://evil.example/"), None);
        assert_eq!(sanitize_return_to("/\\evil.example"), None);
        assert_eq!(sanitize_return_to("profile/"), None);
        assert_eq!(sanitize_return_to("/\t/evil.example/"), None);
        assert_eq!(sanitize_return_to("/x\ny"), None);
        assert_eq!(sanitize_return_to("/caf\u{e9}/"), None);
        assert_eq!(sanitize_return_to("/profile/?tab=cv"), Some("/profile/?tab=cv"));
    }
}
