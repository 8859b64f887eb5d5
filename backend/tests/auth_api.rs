use axum::http::{header, HeaderMap, StatusCode};
use fleetflow_backend::models::user::{UserRole, UserStatus};
use serde_json::json;
use tower::ServiceExt;

mod support;

use support::{body_json, integration_guard, json_request, seed_approved, seed_user, TEST_PASSWORD};

fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            cookie
                .split(';')
                .next()
                .and_then(|pair| pair.trim().strip_prefix(&format!("{}=", name)))
                .map(str::to_string)
        })
}

#[tokio::test]
async fn login_sets_session_cookies_and_me_reports_home() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let dispatcher = seed_approved(&pool, UserRole::Dispatcher).await;
    let app = support::app(&pool);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "DISPATCHER@fleet.test", "password": TEST_PASSWORD })),
        ))
        .await
        .expect("call login");
    let headers = response.headers().clone();
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["home"], "trips");
    assert_eq!(body["user"]["id"], dispatcher.id.to_string());
    let access = set_cookie_value(&headers, "access_token").expect("access cookie");
    assert_eq!(body["access_token"], access);
    assert!(set_cookie_value(&headers, "refresh_token").is_some());

    let (status, me) = body_json(
        app.oneshot(json_request("GET", "/api/auth/me", Some(&access), None))
            .await
            .expect("call me"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["role"], "dispatcher");
    assert_eq!(me["home"], "trips");
}

#[tokio::test]
async fn login_rejects_bad_password_and_unapproved_accounts() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    seed_approved(&pool, UserRole::Dispatcher).await;
    seed_user(&pool, UserRole::SafetyOfficer, UserStatus::Pending).await;
    seed_user(&pool, UserRole::FinancialAnalyst, UserStatus::Rejected).await;
    let app = support::app(&pool);

    let (status, body) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "dispatcher@fleet.test", "password": "wrong" })),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password.");

    for email in ["safety_officer@fleet.test", "financial_analyst@fleet.test"] {
        let (status, _) = body_json(
            app.clone()
                .oneshot(json_request(
                    "POST",
                    "/api/auth/login",
                    None,
                    Some(json!({ "username": email, "password": TEST_PASSWORD })),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{} must not sign in", email);
    }
}

#[tokio::test]
async fn logout_revokes_access_token() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let manager = seed_approved(&pool, UserRole::Manager).await;
    let token = support::token_for(&pool, &manager).await;
    let app = support::app(&pool);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", Some(&token), None))
        .await
        .unwrap();
    let headers = response.headers().clone();
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out.");
    assert_eq!(set_cookie_value(&headers, "access_token").as_deref(), Some(""));

    let (status, _) = body_json(
        app.oneshot(json_request("GET", "/api/auth/me", Some(&token), None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_rotates_once() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    seed_approved(&pool, UserRole::Manager).await;
    let app = support::app(&pool);

    let (_, login) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "manager@fleet.test", "password": TEST_PASSWORD })),
            ))
            .await
            .unwrap(),
    )
    .await;
    let refresh_token = login["refresh_token"].as_str().expect("refresh token").to_string();

    let (status, refreshed) = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/refresh",
                None,
                Some(json!({ "refresh_token": refresh_token })),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(refreshed["refresh_token"], login["refresh_token"]);

    let (status, _) = body_json(
        app.oneshot(json_request(
            "POST",
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        ))
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let _guard = integration_guard().await;
    let Some(pool) = support::test_pool().await else {
        return;
    };
    let (status, _) = body_json(
        support::app(&pool)
            .oneshot(json_request("GET", "/api/vehicles", None, None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
