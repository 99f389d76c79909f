use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::signup::router::signup_router;

fn post(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
        .expect("request")
}

fn signup_payload(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "password": "correct horse battery",
        "role": "APPLICANT",
    })
}

#[tokio::test]
async fn signup_route_stages_and_reports_the_code_window() {
    let (service, _, mailer) = build_service();
    let router = signup_router(Arc::new(service));

    let response = router
        .oneshot(post("/api/v1/auth/signup", signup_payload("a@b.com")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("10 minutes"));
    assert!(mailer.last_code("a@b.com").is_some());
}

#[tokio::test]
async fn signup_route_rejects_registered_emails() {
    let (service, accounts, _) = build_service();
    accounts.seed_verified("a@b.com", "hashed:pw");
    let router = signup_router(Arc::new(service));

    let response = router
        .oneshot(post("/api/v1/auth/signup", signup_payload("a@b.com")))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error").and_then(Value::as_str),
        Some("email already registered")
    );
}

#[tokio::test]
async fn verify_route_returns_an_authenticated_session() {
    let (service, _, mailer) = build_service();
    let service = Arc::new(service);
    let router = signup_router(service.clone());

    let response = router
        .clone()
        .oneshot(post("/api/v1/auth/signup", signup_payload("a@b.com")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let code = mailer.last_code("a@b.com").expect("code mailed");

    let response = router
        .clone()
        .oneshot(post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "a@b.com", "code": code }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("token").and_then(Value::as_str),
        Some("token-a@b.com")
    );
    assert_eq!(payload.get("role"), Some(&json!("APPLICANT")));

    // The code is consumed; replaying the call fails.
    let response = router
        .oneshot(post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "a@b.com", "code": code }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_route_rejects_wrong_codes() {
    let (service, _, mailer) = build_service();
    let router = signup_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(post("/api/v1/auth/signup", signup_payload("a@b.com")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let code = mailer.last_code("a@b.com").expect("code mailed");
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let response = router
        .oneshot(post(
            "/api/v1/auth/verify-otp",
            json!({ "email": "a@b.com", "code": wrong }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error").and_then(Value::as_str),
        Some("invalid or expired OTP")
    );
}

#[tokio::test]
async fn signup_route_rejects_unknown_roles() {
    let (service, _, _) = build_service();
    let router = signup_router(Arc::new(service));

    let mut payload = signup_payload("a@b.com");
    payload["role"] = json!("DEFAULT");
    let response = router
        .oneshot(post("/api/v1/auth/signup", payload))
        .await
        .expect("route executes");

    // Serde rejects the body before the handler runs.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_route_distinguishes_credential_failures() {
    let (service, _, mailer) = build_service();
    let service = Arc::new(service);
    let router = signup_router(service.clone());

    service.signup(request("a@b.com")).expect("signup stages");
    let code = mailer.last_code("a@b.com").expect("code mailed");
    service.verify_otp("a@b.com", &code).expect("promotion succeeds");

    let response = router
        .clone()
        .oneshot(post(
            "/api/v1/auth/login",
            json!({ "email": "a@b.com", "password": "wrong" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(post(
            "/api/v1/auth/login",
            json!({ "email": "a@b.com", "password": "correct horse battery" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some("Login successful")
    );
}
