use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use rand::Rng;
use tracing::info;

use interview_scheduler::signup::{
    AccountRecord, AccountStore, AccountStoreError, MailerError, NewAccount, OtpMailer,
    PasswordEncoder, PasswordHashError, TokenError, TokenService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAccountStore {
    records: Arc<Mutex<HashMap<String, AccountRecord>>>,
}

impl AccountStore for InMemoryAccountStore {
    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, AccountStoreError> {
        let guard = self.records.lock().expect("account mutex poisoned");
        Ok(guard.get(email).cloned())
    }

    fn create(&self, account: NewAccount) -> Result<AccountRecord, AccountStoreError> {
        let mut guard = self.records.lock().expect("account mutex poisoned");
        if guard.contains_key(&account.email) {
            return Err(AccountStoreError::Conflict);
        }
        let record = AccountRecord {
            name: account.name,
            email: account.email.clone(),
            password_hash: account.password_hash,
            role: account.role,
            email_verified: false,
            created_at: Utc::now(),
        };
        guard.insert(account.email, record.clone());
        Ok(record)
    }

    fn mark_verified(&self, email: &str) -> Result<(), AccountStoreError> {
        let mut guard = self.records.lock().expect("account mutex poisoned");
        match guard.get_mut(email) {
            Some(record) => {
                record.email_verified = true;
                Ok(())
            }
            None => Err(AccountStoreError::NotFound),
        }
    }
}

pub(crate) struct Argon2PasswordEncoder;

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError(err.to_string()))
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(hash).map_err(|err| PasswordHashError(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok())
    }
}

/// Opaque random session tokens held in memory, resolved back to the email
/// they were issued for.
#[derive(Default, Clone)]
pub(crate) struct SessionTokenService {
    sessions: Arc<Mutex<HashMap<String, String>>>,
}

impl TokenService for SessionTokenService {
    fn issue(&self, email: &str) -> Result<String, TokenError> {
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        let token = hex::encode(bytes);
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(token.clone(), email.to_string());
        Ok(token)
    }

    fn resolve(&self, token: &str) -> Result<Option<String>, TokenError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(token).cloned())
    }
}

/// Development mailer: the code lands in the service log instead of an inbox.
pub(crate) struct TracingOtpMailer;

impl OtpMailer for TracingOtpMailer {
    fn send_code(&self, email: &str, code: &str) -> Result<(), MailerError> {
        info!(%email, %code, "verification code issued");
        Ok(())
    }
}
