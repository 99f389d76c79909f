//! Two-phase, OTP-gated signup.
//!
//! A signup call stages the account data in a TTL-bounded holding area and
//! issues a one-time numeric code. Verification consumes the code and, while
//! the staged record is still live, promotes it into the durable account
//! store. Durable storage, password hashing, token issuance, and mail
//! delivery are external collaborators behind traits.

pub mod accounts;
pub mod domain;
pub mod otp;
pub mod router;
pub mod service;
pub mod staging;

#[cfg(test)]
mod tests;

pub use accounts::{
    AccountRecord, AccountStore, AccountStoreError, MailerError, NewAccount, OtpMailer,
    PasswordEncoder, PasswordHashError, TokenError, TokenService,
};
pub use domain::{normalize_email, AuthSession, Role, RoleParseError, SignupRequest, StagedSignup};
pub use otp::{OtpGate, OTP_LENGTH};
pub use router::{signup_router, LoginRequest, VerifyOtpRequest};
pub use service::{SignupError, SignupService};
pub use staging::SignupStaging;
