use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::SignupConfig;
use crate::signup::accounts::{
    AccountRecord, AccountStore, AccountStoreError, MailerError, NewAccount, OtpMailer,
    PasswordEncoder, PasswordHashError, TokenError, TokenService,
};
use crate::signup::domain::{Role, SignupRequest};
use crate::signup::service::SignupService;

pub(super) fn signup_config(staging_ttl: Duration, otp_ttl: Duration) -> SignupConfig {
    SignupConfig {
        staging_ttl,
        otp_ttl,
    }
}

pub(super) fn ten_minutes() -> Duration {
    Duration::from_secs(600)
}

pub(super) fn request(email: &str) -> SignupRequest {
    SignupRequest {
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        password: "correct horse battery".to_string(),
        role: Role::Applicant,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAccounts {
    records: Arc<Mutex<HashMap<String, AccountRecord>>>,
}

impl MemoryAccounts {
    pub(super) fn account(&self, email: &str) -> Option<AccountRecord> {
        self.records.lock().expect("accounts mutex poisoned").get(email).cloned()
    }

    pub(super) fn seed_verified(&self, email: &str, password_hash: &str) {
        let mut guard = self.records.lock().expect("accounts mutex poisoned");
        guard.insert(
            email.to_string(),
            AccountRecord {
                name: "Seeded".to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role: Role::Applicant,
                email_verified: true,
                created_at: Utc::now(),
            },
        );
    }
}

impl AccountStore for MemoryAccounts {
    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, AccountStoreError> {
        let guard = self.records.lock().expect("accounts mutex poisoned");
        Ok(guard.get(email).cloned())
    }

    fn create(&self, account: NewAccount) -> Result<AccountRecord, AccountStoreError> {
        let mut guard = self.records.lock().expect("accounts mutex poisoned");
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
        let mut guard = self.records.lock().expect("accounts mutex poisoned");
        match guard.get_mut(email) {
            Some(record) => {
                record.email_verified = true;
                Ok(())
            }
            None => Err(AccountStoreError::NotFound),
        }
    }
}

/// Account store whose reads work but whose writes are down, for exercising
/// promotion against an unavailable durable store.
pub(super) struct WriteFailingAccounts;

impl AccountStore for WriteFailingAccounts {
    fn find_by_email(&self, _email: &str) -> Result<Option<AccountRecord>, AccountStoreError> {
        Ok(None)
    }

    fn create(&self, _account: NewAccount) -> Result<AccountRecord, AccountStoreError> {
        Err(AccountStoreError::Unavailable("database offline".to_string()))
    }

    fn mark_verified(&self, _email: &str) -> Result<(), AccountStoreError> {
        Err(AccountStoreError::Unavailable("database offline".to_string()))
    }
}

/// Reversible stand-in encoder so tests can assert hashes without argon2.
pub(super) struct PlainEncoder;

impl PasswordEncoder for PlainEncoder {
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError> {
        Ok(format!("hashed:{raw}"))
    }

    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("hashed:{raw}"))
    }
}

pub(super) struct StaticTokens;

impl TokenService for StaticTokens {
    fn issue(&self, email: &str) -> Result<String, TokenError> {
        Ok(format!("token-{email}"))
    }

    fn resolve(&self, token: &str) -> Result<Option<String>, TokenError> {
        Ok(token.strip_prefix("token-").map(str::to_string))
    }
}

/// Mailer double capturing issued codes so tests can read them back.
#[derive(Default, Clone)]
pub(super) struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingMailer {
    pub(super) fn last_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub(super) fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer mutex poisoned").len()
    }
}

impl OtpMailer for RecordingMailer {
    fn send_code(&self, email: &str, code: &str) -> Result<(), MailerError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

pub(super) type TestSignupService<A = MemoryAccounts> =
    SignupService<A, PlainEncoder, StaticTokens, RecordingMailer>;

pub(super) fn build_service() -> (TestSignupService, Arc<MemoryAccounts>, Arc<RecordingMailer>) {
    build_service_with_config(&signup_config(ten_minutes(), ten_minutes()))
}

pub(super) fn build_service_with_config(
    config: &SignupConfig,
) -> (TestSignupService, Arc<MemoryAccounts>, Arc<RecordingMailer>) {
    let accounts = Arc::new(MemoryAccounts::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = SignupService::new(
        accounts.clone(),
        Arc::new(PlainEncoder),
        Arc::new(StaticTokens),
        mailer.clone(),
        config,
    );
    (service, accounts, mailer)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
