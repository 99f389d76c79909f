use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::domain::{ApplicantClaims, InterviewId};
use super::repository::StoreError;

/// Reverse index from applicant email to the interviews they hold a slot in.
///
/// `record_claim` must be atomic per email so that concurrent claims cannot
/// interleave a read-modify-write and drop an interview id.
pub trait ApplicantDirectory: Send + Sync {
    fn record_claim(&self, email: &str, interview: &InterviewId) -> Result<(), StoreError>;
    fn fetch(&self, email: &str) -> Result<Option<ApplicantClaims>, StoreError>;
}

#[derive(Default, Clone)]
pub struct MemoryApplicantDirectory {
    records: Arc<Mutex<HashMap<String, ApplicantClaims>>>,
}

impl ApplicantDirectory for MemoryApplicantDirectory {
    fn record_claim(&self, email: &str, interview: &InterviewId) -> Result<(), StoreError> {
        let now = Utc::now();
        // Lock held across the upsert so the read and write are one step.
        let mut guard = self.records.lock().expect("directory mutex poisoned");
        match guard.get_mut(email) {
            Some(claims) => {
                claims.record(interview.clone(), now);
            }
            None => {
                guard.insert(
                    email.to_string(),
                    ApplicantClaims::first_claim(email, interview.clone(), now),
                );
            }
        }
        Ok(())
    }

    fn fetch(&self, email: &str) -> Result<Option<ApplicantClaims>, StoreError> {
        let guard = self.records.lock().expect("directory mutex poisoned");
        Ok(guard.get(email).cloned())
    }
}
