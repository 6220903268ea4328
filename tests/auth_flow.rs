mod common;

use axum::http::StatusCode;

use chrono::{Duration, Utc};

use campusconnect::database::session_repo;
use campusconnect::models::Role;
use common::*;

#[tokio::test]
async fn test_signup_defaults_to_seeker() {
    let (router, pool) = test_app().await;

    let cookie = signup(&router, "alex", false).await;
    assert!(!cookie.is_empty());

    let account = account(&pool, "alex").await;
    assert_eq!(account.role, Role::Seeker);
    assert_eq!(account.email, "alex@uni.edu");
    assert!(account.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_signup_with_finder_flag() {
    let (router, pool) = test_app().await;
    signup(&router, "jo", true).await;
    assert_eq!(account(&pool, "jo").await.role, Role::Finder);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_username() {
    let (router, _pool) = test_app().await;
    signup(&router, "alex", false).await;

    let resp = post_form(
        &router,
        "/signup/",
        None,
        &[
            ("username", "alex"),
            ("email", "other@uni.edu"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ],
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("A user with that username already exists."));
    assert!(resp.session_cookie().is_none());
}

#[tokio::test]
async fn test_signup_password_mismatch_redisplays_form() {
    let (router, _pool) = test_app().await;
    let resp = post_form(
        &router,
        "/signup/",
        None,
        &[
            ("username", "alex"),
            ("email", "alex@uni.edu"),
            ("password1", PASSWORD),
            ("password2", "something-else"),
        ],
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("didn&#x27;t match") || resp.body.contains("didn't match"));
    assert!(resp.body.contains("value=\"alex\""));
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    let (router, _pool) = test_app().await;
    signup(&router, "alex", false).await;

    for login in ["alex", "alex@uni.edu"] {
        let resp = post_form(
            &router,
            "/login/",
            None,
            &[("username", login), ("password", PASSWORD)],
        )
        .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location(), "/role-selection/");
        assert!(resp.session_cookie().is_some());
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (router, _pool) = test_app().await;
    signup(&router, "alex", false).await;

    let resp = post_form(
        &router,
        "/login/",
        None,
        &[("username", "alex"), ("password", "wrong-password")],
    )
    .await;

    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body.contains("Please enter a correct username and password"));
    assert!(resp.session_cookie().is_none());
}

#[tokio::test]
async fn test_login_follows_safe_next_only() {
    let (router, _pool) = test_app().await;
    signup(&router, "alex", false).await;

    let resp = post_form(
        &router,
        "/login/",
        None,
        &[
            ("username", "alex"),
            ("password", PASSWORD),
            ("next", "/seeker-dashboard/"),
        ],
    )
    .await;
    assert_eq!(resp.location(), "/seeker-dashboard/");

    let resp = post_form(
        &router,
        "/login/",
        None,
        &[
            ("username", "alex"),
            ("password", PASSWORD),
            ("next", "https://evil.example/"),
        ],
    )
    .await;
    assert_eq!(resp.location(), "/role-selection/");

    for next in ["/\t/evil.example/", "/x\ny", "/caf\u{e9}/"] {
        let resp = post_form(
            &router,
            "/login/",
            None,
            &[("username", "alex"), ("password", PASSWORD), ("next", next)],
        )
        .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{:?}", next);
        assert_eq!(resp.location(), "/role-selection/");
        assert!(resp.session_cookie().is_some());
    }
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let (router, _pool) = test_app().await;

    for path in [
        "/seeker-dashboard/",
        "/finder-dashboard/",
        "/role-selection/",
        "/seeker-setup/",
        "/finder-setup/",
        "/profile/",
    ] {
        let resp = get(&router, path, None).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(
            resp.location(),
            format!("/login/?next={}", path.replace('/', "%2F"))
        );
        assert!(!resp.body.contains("dashboard"));
    }

    let resp = get(&router, "/seeker-dashboard/", Some("session_id=not-a-session")).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert!(resp.location().starts_with("/login/"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (router, _pool) = test_app().await;
    let cookie = signup(&router, "alex", false).await;

    assert_eq!(get(&router, "/profile/", Some(&cookie)).await.status, StatusCode::OK);

    let resp = get(&router, "/logout/", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), "/");
    assert_eq!(resp.session_cookie().as_deref(), Some("session_id="));

    let resp = get(&router, "/profile/", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert!(resp.location().starts_with("/login/"));
}

#[tokio::test]
async fn test_home_page_is_public() {
    let (router, _pool) = test_app().await;
    let resp = get(&router, "/", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("CampusConnect"));
    assert!(resp.body.contains("/signup/"));

    let resp = get(&router, "/login/?next=/profile/", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains("name=\"next\""));
    assert!(resp.body.contains("profile"));
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let (router, pool) = test_app().await;
    signup(&router, "alex", false).await;
    let alex = account(&pool, "alex").await;

    let now = Utc::now();
    session_repo::insert_session(
        &pool,
        "expired-session",
        alex.id,
        now - Duration::days(20),
        now - Duration::minutes(1),
    )
    .await
    .unwrap();

    let resp = get(&router, "/seeker-dashboard/", Some("session_id=expired-session")).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert!(resp.location().starts_with("/login/"));
    assert!(session_repo::load_session(&pool, "expired-session")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_shared_email_cannot_log_in_by_email() {
    let (router, _pool) = test_app().await;
    signup(&router, "alex", false).await;

    let resp = post_form(
        &router,
        "/signup/",
        None,
        &[
            ("username", "alex2"),
            ("email", "alex@uni.edu"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ],
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);

    let resp = post_form(
        &router,
        "/login/",
        None,
        &[("username", "alex@uni.edu"), ("password", PASSWORD)],
    )
    .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);

    for username in ["alex", "alex2"] {
        let resp = post_form(
            &router,
            "/login/",
            None,
            &[("username", username), ("password", PASSWORD)],
        )
        .await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{}", username);
    }
}
