use crate::infra::AppState;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use interview_scheduler::scheduling::{
    interview_router, ApplicantDirectory, InterviewStore, SchedulingState,
};
use interview_scheduler::signup::{
    signup_router, AccountStore, OtpMailer, PasswordEncoder, SignupService, TokenService,
};

pub(crate) fn with_service_routes<S, D, A, P, T, M>(
    scheduling: SchedulingState<S, D, T>,
    signup: Arc<SignupService<A, P, T, M>>,
) -> axum::Router
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    interview_router(scheduling)
        .merge(signup_router(signup))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}
