use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::Role;

/// Durable account as stored by the external account store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload handed to the account store during promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Durable account storage. Out of scope here; implemented by the api
/// service and by tests.
pub trait AccountStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, AccountStoreError>;
    fn create(&self, account: NewAccount) -> Result<AccountRecord, AccountStoreError>;
    fn mark_verified(&self, email: &str) -> Result<(), AccountStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Password hashing seam, mirroring an encode/matches encoder interface.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> Result<String, PasswordHashError>;
    fn matches(&self, raw: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

/// Token issuance and resolution for authenticated requests.
pub trait TokenService: Send + Sync {
    fn issue(&self, email: &str) -> Result<String, TokenError>;
    /// The email the token identifies, or `None` for an unknown token.
    fn resolve(&self, token: &str) -> Result<Option<String>, TokenError>;
}

#[derive(Debug, thiserror::Error)]
#[error("token service unavailable: {0}")]
pub struct TokenError(pub String);

/// Outbound delivery of issued verification codes.
pub trait OtpMailer: Send + Sync {
    fn send_code(&self, email: &str, code: &str) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
#[error("mail transport unavailable: {0}")]
pub struct MailerError(pub String);
