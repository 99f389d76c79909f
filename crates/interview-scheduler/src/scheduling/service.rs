use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use super::directory::ApplicantDirectory;
use super::domain::{Interview, InterviewId, InterviewSummary};
use super::grid::{GridError, SlotClaim};
use super::repository::{InterviewStore, StoreError};

/// Service composing the interview store and the applicant directory.
///
/// All grid mutation funnels through `book_slot`, which delegates the
/// check-and-set to the store's per-interview serialization point.
pub struct BookingService<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
}

static INTERVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_interview_id() -> InterviewId {
    let id = INTERVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InterviewId(format!("itv-{id:06}"))
}

impl<S, D> BookingService<S, D>
where
    S: InterviewStore + 'static,
    D: ApplicantDirectory + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self { store, directory }
    }

    /// Publish a new interview with every requested slot unoccupied.
    pub fn create_interview(
        &self,
        interview_name: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        requested_slots: HashMap<String, Vec<String>>,
        created_by: &str,
    ) -> Result<InterviewId, BookingError> {
        let id = next_interview_id();
        let interview = Interview::new(
            id.clone(),
            interview_name,
            from_date,
            to_date,
            requested_slots,
            created_by,
            Utc::now(),
        )?;
        self.store.insert(interview)?;
        info!(id = %id.0, name = %interview_name, %created_by, "interview published");
        Ok(id)
    }

    /// Interviews that still have at least one unoccupied slot.
    pub fn available_interviews(&self) -> Result<Vec<InterviewSummary>, BookingError> {
        let interviews = self.store.list()?;
        Ok(interviews
            .iter()
            .filter(|interview| interview.has_available_slots())
            .map(Interview::summary)
            .collect())
    }

    pub fn interviews_by_creator(&self, created_by: &str) -> Result<Vec<Interview>, BookingError> {
        let interviews = self.store.list()?;
        Ok(interviews
            .into_iter()
            .filter(|interview| interview.created_by == created_by)
            .collect())
    }

    /// Fetch an interview, restricted to its creator.
    pub fn interview(
        &self,
        id: &InterviewId,
        requester: &str,
    ) -> Result<Interview, BookingError> {
        let interview = self.store.fetch(id)?.ok_or(BookingError::NotFound)?;
        if interview.created_by != requester {
            return Err(BookingError::Forbidden);
        }
        Ok(interview)
    }

    /// Delete an interview, restricted to its creator.
    pub fn delete_interview(&self, id: &InterviewId, requester: &str) -> Result<(), BookingError> {
        let interview = self.store.fetch(id)?.ok_or(BookingError::NotFound)?;
        if interview.created_by != requester {
            return Err(BookingError::Forbidden);
        }
        match self.store.delete(id) {
            Ok(()) | Err(StoreError::NotFound) => Ok(()),
            Err(other) => Err(other.into()),
        }
    }

    /// Claim one slot for the applicant.
    ///
    /// Preconditions are checked in order: the interview exists, the
    /// `(date, time)` key is in the grid, and the slot is unoccupied. Of two
    /// concurrent claims on the same key exactly one wins; the loser sees
    /// `AlreadyBooked`. The applicant directory is only updated after the
    /// claim committed.
    pub fn book_slot(
        &self,
        id: &InterviewId,
        date: &str,
        time: &str,
        email: &str,
    ) -> Result<(), BookingError> {
        let outcome = match self.store.claim_slot(id, date, time, email) {
            Ok(outcome) => outcome,
            Err(StoreError::NotFound) => return Err(BookingError::NotFound),
            Err(other) => return Err(other.into()),
        };

        match outcome {
            SlotClaim::Booked => {
                self.directory.record_claim(email, id)?;
                info!(id = %id.0, %date, %time, %email, "slot booked");
                Ok(())
            }
            SlotClaim::AlreadyBooked => Err(BookingError::AlreadyBooked),
            SlotClaim::InvalidSlot => Err(BookingError::InvalidSlot),
        }
    }

    /// The slot the applicant holds in the interview, if any.
    pub fn claimed_slot(
        &self,
        id: &InterviewId,
        email: &str,
    ) -> Result<Option<(String, String)>, BookingError> {
        let interview = self.store.fetch(id)?.ok_or(BookingError::NotFound)?;
        Ok(interview.occupant_slot(email))
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("interview not found")]
    NotFound,
    #[error("invalid time slot")]
    InvalidSlot,
    #[error("slot already booked")]
    AlreadyBooked,
    #[error("not the interview owner")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}
