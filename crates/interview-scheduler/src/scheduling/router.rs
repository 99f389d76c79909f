use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::signup::accounts::TokenService;

use super::directory::ApplicantDirectory;
use super::domain::InterviewId;
use super::repository::InterviewStore;
use super::service::{BookingError, BookingService};

/// Shared state for the interview endpoints: the booking service plus the
/// token seam used to resolve the caller's identity.
pub struct SchedulingState<S, D, T> {
    pub bookings: Arc<BookingService<S, D>>,
    pub tokens: Arc<T>,
}

impl<S, D, T> Clone for SchedulingState<S, D, T> {
    fn clone(&self) -> Self {
        Self {
            bookings: self.bookings.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInterviewRequest {
    pub interview_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(default)]
    pub time_slots: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BookSlotRequest {
    pub date: String,
    pub time_slot: String,
}

/// Router builder exposing HTTP endpoints for publishing and booking.
pub fn interview_router<S, D, T>(state: SchedulingState<S, D, T>) -> Router
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    Router::new()
        .route("/api/v1/interviews", post(create_handler::<S, D, T>))
        .route(
            "/api/v1/interviews/available",
            get(available_handler::<S, D, T>),
        )
        .route("/api/v1/interviews/my", get(my_interviews_handler::<S, D, T>))
        .route(
            "/api/v1/interviews/:id",
            get(get_handler::<S, D, T>).delete(delete_handler::<S, D, T>),
        )
        .route(
            "/api/v1/interviews/:id/book",
            post(book_handler::<S, D, T>),
        )
        .with_state(state)
}

/// Resolve the caller's email from the `Authorization: Bearer` header.
fn bearer_email<T: TokenService>(headers: &HeaderMap, tokens: &T) -> Result<String, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Err(unauthorized());
    };
    match tokens.resolve(token) {
        Ok(Some(email)) => Ok(email),
        Ok(None) => Err(unauthorized()),
        Err(err) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response()),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(json!({ "error": "missing or invalid token" })),
    )
        .into_response()
}

fn booking_error_response(error: BookingError) -> Response {
    let status = match &error {
        BookingError::NotFound => StatusCode::NOT_FOUND,
        BookingError::Grid(_) | BookingError::InvalidSlot | BookingError::AlreadyBooked => {
            StatusCode::BAD_REQUEST
        }
        BookingError::Forbidden => StatusCode::FORBIDDEN,
        BookingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}

pub(crate) async fn create_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
    axum::Json(request): axum::Json<CreateInterviewRequest>,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    let created_by = match bearer_email(&headers, state.tokens.as_ref()) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.bookings.create_interview(
        &request.interview_name,
        request.from_date,
        request.to_date,
        request.time_slots,
        &created_by,
    ) {
        Ok(id) => (StatusCode::OK, axum::Json(json!({ "id": id.0 }))).into_response(),
        Err(error) => booking_error_response(error),
    }
}

pub(crate) async fn available_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    if let Err(response) = bearer_email(&headers, state.tokens.as_ref()) {
        return response;
    }

    match state.bookings.available_interviews() {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(error) => booking_error_response(error),
    }
}

pub(crate) async fn my_interviews_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    let created_by = match bearer_email(&headers, state.tokens.as_ref()) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.bookings.interviews_by_creator(&created_by) {
        Ok(interviews) => (StatusCode::OK, axum::Json(interviews)).into_response(),
        Err(error) => booking_error_response(error),
    }
}

pub(crate) async fn get_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    let requester = match bearer_email(&headers, state.tokens.as_ref()) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.bookings.interview(&InterviewId(id), &requester) {
        Ok(interview) => (StatusCode::OK, axum::Json(interview)).into_response(),
        Err(error) => booking_error_response(error),
    }
}

pub(crate) async fn delete_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    let requester = match bearer_email(&headers, state.tokens.as_ref()) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state.bookings.delete_interview(&InterviewId(id), &requester) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "deleted" }))).into_response(),
        Err(error) => booking_error_response(error),
    }
}

pub(crate) async fn book_handler<S, D, T>(
    State(state): State<SchedulingState<S, D, T>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<BookSlotRequest>,
) -> Response
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
    T: TokenService + 'static,
{
    let email = match bearer_email(&headers, state.tokens.as_ref()) {
        Ok(email) => email,
        Err(response) => return response,
    };

    match state
        .bookings
        .book_slot(&InterviewId(id), &request.date, &request.time_slot, &email)
    {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "booked" }))).into_response(),
        Err(error) => booking_error_response(error),
    }
}
