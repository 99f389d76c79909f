use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::accounts::{AccountStore, OtpMailer, PasswordEncoder, TokenService};
use super::domain::SignupRequest;
use super::service::{SignupError, SignupService};

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Router builder exposing the signup, verification, and login endpoints.
pub fn signup_router<A, P, T, M>(service: Arc<SignupService<A, P, T, M>>) -> Router
where
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    Router::new()
        .route("/api/v1/auth/signup", post(signup_handler::<A, P, T, M>))
        .route(
            "/api/v1/auth/verify-otp",
            post(verify_otp_handler::<A, P, T, M>),
        )
        .route("/api/v1/auth/login", post(login_handler::<A, P, T, M>))
        .with_state(service)
}

pub(crate) async fn signup_handler<A, P, T, M>(
    State(service): State<Arc<SignupService<A, P, T, M>>>,
    axum::Json(request): axum::Json<SignupRequest>,
) -> Response
where
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    match service.signup(request) {
        Ok(()) => {
            let payload = json!({
                "message": "Signup started. Check your email for the code (valid 10 minutes).",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(SignupError::EmailAlreadyRegistered) => {
            let payload = json!({
                "error": SignupError::EmailAlreadyRegistered.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn verify_otp_handler<A, P, T, M>(
    State(service): State<Arc<SignupService<A, P, T, M>>>,
    axum::Json(request): axum::Json<VerifyOtpRequest>,
) -> Response
where
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    match service.verify_otp(&request.email, &request.code) {
        Ok(session) => {
            let payload = json!({
                "message": "Email verified. Logged in",
                "token": session.token,
                "role": session.role,
                "name": session.name,
                "email": session.email,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error @ (SignupError::OtpInvalidOrExpired | SignupError::StagingExpired)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn login_handler<A, P, T, M>(
    State(service): State<Arc<SignupService<A, P, T, M>>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    match service.login(&request.email, &request.password) {
        Ok(session) => {
            let payload = json!({
                "message": "Login successful",
                "token": session.token,
                "role": session.role,
                "name": session.name,
                "email": session.email,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error @ (SignupError::InvalidCredentials | SignupError::EmailNotVerified)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: SignupError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
