use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::domain::StagedSignup;

struct StagedRecord {
    signup: StagedSignup,
    expires_at: Instant,
}

/// TTL-bounded holding area for not-yet-durable signups, keyed by email.
///
/// At most one live record exists per email: staging again overwrites the
/// prior record and restarts its TTL. Expiry is checked on read, so a record
/// past its deadline reads as absent even before it is dropped.
pub struct SignupStaging {
    ttl: Duration,
    records: Mutex<HashMap<String, StagedRecord>>,
}

impl SignupStaging {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            records: Mutex::new(HashMap::new()),
        }
    }

    /// Write or overwrite the staged signup for its email, with a fresh TTL.
    pub fn stage(&self, signup: StagedSignup) {
        let expires_at = Instant::now() + self.ttl;
        let mut guard = self.records.lock().expect("staging mutex poisoned");
        guard.insert(signup.email.clone(), StagedRecord { signup, expires_at });
    }

    /// The live staged signup for `email`, or `None` if absent or expired.
    pub fn fetch(&self, email: &str) -> Option<StagedSignup> {
        let mut guard = self.records.lock().expect("staging mutex poisoned");
        match guard.get(email) {
            Some(record) if Instant::now() < record.expires_at => Some(record.signup.clone()),
            Some(_) => {
                guard.remove(email);
                None
            }
            None => None,
        }
    }

    /// Idempotent delete.
    pub fn remove(&self, email: &str) {
        let mut guard = self.records.lock().expect("staging mutex poisoned");
        guard.remove(email);
    }
}
