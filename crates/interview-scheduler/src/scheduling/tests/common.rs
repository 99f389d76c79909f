use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::scheduling::directory::MemoryApplicantDirectory;
use crate::scheduling::domain::{Interview, InterviewId};
use crate::scheduling::grid::SlotClaim;
use crate::scheduling::repository::{InterviewStore, MemoryInterviewStore, StoreError};
use crate::scheduling::router::SchedulingState;
use crate::scheduling::service::BookingService;
use crate::signup::accounts::{TokenError, TokenService};

pub(super) fn sample_slots() -> HashMap<String, Vec<String>> {
    let mut slots = HashMap::new();
    slots.insert(
        "2025-01-10".to_string(),
        vec!["09:00".to_string(), "10:00".to_string()],
    );
    slots.insert("2025-01-11".to_string(), vec!["14:00".to_string()]);
    slots
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn sample_interview(id: &str) -> Interview {
    Interview::new(
        InterviewId(id.to_string()),
        "Backend screening",
        date(2025, 1, 10),
        date(2025, 1, 11),
        sample_slots(),
        "organizer@corp.com",
        Utc.with_ymd_and_hms(2025, 1, 2, 9, 0, 0).single().expect("valid timestamp"),
    )
    .expect("valid range")
}

pub(super) fn build_service() -> (
    BookingService<MemoryInterviewStore, MemoryApplicantDirectory>,
    Arc<MemoryInterviewStore>,
    Arc<MemoryApplicantDirectory>,
) {
    let store = Arc::new(MemoryInterviewStore::default());
    let directory = Arc::new(MemoryApplicantDirectory::default());
    let service = BookingService::new(store.clone(), directory.clone());
    (service, store, directory)
}

/// Token seam double: `token-<email>` resolves back to `<email>`.
pub(super) struct StaticTokens;

impl TokenService for StaticTokens {
    fn issue(&self, email: &str) -> Result<String, TokenError> {
        Ok(format!("token-{email}"))
    }

    fn resolve(&self, token: &str) -> Result<Option<String>, TokenError> {
        Ok(token.strip_prefix("token-").map(str::to_string))
    }
}

pub(super) struct UnavailableInterviewStore;

impl InterviewStore for UnavailableInterviewStore {
    fn insert(&self, _interview: Interview) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &InterviewId) -> Result<Option<Interview>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Interview>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &InterviewId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn claim_slot(
        &self,
        _id: &InterviewId,
        _date: &str,
        _time: &str,
        _email: &str,
    ) -> Result<SlotClaim, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn scheduling_router_with_service(
    service: BookingService<MemoryInterviewStore, MemoryApplicantDirectory>,
) -> axum::Router {
    crate::scheduling::router::interview_router(SchedulingState {
        bookings: Arc::new(service),
        tokens: Arc::new(StaticTokens),
    })
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
