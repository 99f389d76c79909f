use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::Rng;

/// Number of digits in an issued code.
pub const OTP_LENGTH: usize = 6;

struct IssuedCode {
    code: String,
    expires_at: Instant,
}

/// One-time numeric codes keyed by email, each bounded by a fixed TTL.
///
/// Only the most recently issued code for an email is valid; reissuing
/// replaces the prior code. A code verifies successfully at most once: the
/// check and the delete happen under one lock acquisition, so of two racing
/// verify calls exactly one consumes the code.
pub struct OtpGate {
    ttl: Duration,
    codes: Mutex<HashMap<String, IssuedCode>>,
}

impl OtpGate {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Generate a uniformly random zero-padded 6-digit code and store it for
    /// `email`, replacing any prior unconsumed code.
    pub fn issue(&self, email: &str) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        let expires_at = Instant::now() + self.ttl;
        let mut guard = self.codes.lock().expect("otp mutex poisoned");
        guard.insert(
            email.to_string(),
            IssuedCode {
                code: code.clone(),
                expires_at,
            },
        );
        code
    }

    /// `true` exactly when a live code exists for `email` and matches. The
    /// record is deleted on a match; a mismatch leaves it intact so the
    /// applicant may retry until the TTL lapses.
    pub fn verify(&self, email: &str, submitted: &str) -> bool {
        let mut guard = self.codes.lock().expect("otp mutex poisoned");
        let Some(entry) = guard.get(email) else {
            return false;
        };
        if Instant::now() >= entry.expires_at {
            guard.remove(email);
            return false;
        }
        if constant_time_eq(&entry.code, submitted) {
            guard.remove(email);
            true
        } else {
            false
        }
    }
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
