use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Interview, InterviewId};
use super::grid::SlotClaim;

/// Storage abstraction for published interviews.
///
/// `claim_slot` is the serialization point for the booking protocol: an
/// implementation must run the grid's check-and-set so that two concurrent
/// claims against the same `(interview, date, time)` key linearize, with
/// exactly one observing the unoccupied slot. Claims against different
/// interviews must not block each other.
pub trait InterviewStore: Send + Sync {
    fn insert(&self, interview: Interview) -> Result<(), StoreError>;
    fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, StoreError>;
    fn list(&self) -> Result<Vec<Interview>, StoreError>;
    fn delete(&self, id: &InterviewId) -> Result<(), StoreError>;
    fn claim_slot(
        &self,
        id: &InterviewId,
        date: &str,
        time: &str,
        email: &str,
    ) -> Result<SlotClaim, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store keeping each interview behind its own lock.
///
/// The outer map lock is held only long enough to look up the entry, so
/// claims on different interviews proceed concurrently while claims on the
/// same interview serialize on its entry lock.
#[derive(Default, Clone)]
pub struct MemoryInterviewStore {
    records: Arc<Mutex<HashMap<InterviewId, Arc<Mutex<Interview>>>>>,
}

impl MemoryInterviewStore {
    fn entry(&self, id: &InterviewId) -> Option<Arc<Mutex<Interview>>> {
        let guard = self.records.lock().expect("interview map mutex poisoned");
        guard.get(id).cloned()
    }
}

impl InterviewStore for MemoryInterviewStore {
    fn insert(&self, interview: Interview) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("interview map mutex poisoned");
        if guard.contains_key(&interview.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(interview.id.clone(), Arc::new(Mutex::new(interview)));
        Ok(())
    }

    fn fetch(&self, id: &InterviewId) -> Result<Option<Interview>, StoreError> {
        Ok(self
            .entry(id)
            .map(|entry| entry.lock().expect("interview mutex poisoned").clone()))
    }

    fn list(&self) -> Result<Vec<Interview>, StoreError> {
        let entries: Vec<Arc<Mutex<Interview>>> = {
            let guard = self.records.lock().expect("interview map mutex poisoned");
            guard.values().cloned().collect()
        };
        Ok(entries
            .into_iter()
            .map(|entry| entry.lock().expect("interview mutex poisoned").clone())
            .collect())
    }

    fn delete(&self, id: &InterviewId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("interview map mutex poisoned");
        match guard.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }

    fn claim_slot(
        &self,
        id: &InterviewId,
        date: &str,
        time: &str,
        email: &str,
    ) -> Result<SlotClaim, StoreError> {
        let Some(entry) = self.entry(id) else {
            return Err(StoreError::NotFound);
        };
        let mut interview = entry.lock().expect("interview mutex poisoned");
        Ok(interview.claim(date, time, email))
    }
}
