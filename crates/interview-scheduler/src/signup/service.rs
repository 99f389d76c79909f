use std::sync::Arc;

use tracing::info;

use crate::config::SignupConfig;

use super::accounts::{
    AccountStore, AccountStoreError, MailerError, NewAccount, OtpMailer, PasswordEncoder,
    PasswordHashError, TokenError, TokenService,
};
use super::domain::{normalize_email, AuthSession, SignupRequest, StagedSignup};
use super::otp::OtpGate;
use super::staging::SignupStaging;

/// Orchestrates the two-phase signup: staging plus OTP on the first call,
/// promotion into the durable account store on successful verification.
///
/// OTP consumption is the linearization point for promotion. `OtpGate`
/// checks and deletes under one lock acquisition, so of two racing verify
/// calls exactly one proceeds to the account store; the loser fails before
/// any side effect.
pub struct SignupService<A, P, T, M> {
    accounts: Arc<A>,
    encoder: Arc<P>,
    tokens: Arc<T>,
    mailer: Arc<M>,
    staging: SignupStaging,
    otp: OtpGate,
}

impl<A, P, T, M> SignupService<A, P, T, M>
where
    A: AccountStore + 'static,
    P: PasswordEncoder + 'static,
    T: TokenService + 'static,
    M: OtpMailer + 'static,
{
    pub fn new(
        accounts: Arc<A>,
        encoder: Arc<P>,
        tokens: Arc<T>,
        mailer: Arc<M>,
        config: &SignupConfig,
    ) -> Self {
        Self {
            accounts,
            encoder,
            tokens,
            mailer,
            staging: SignupStaging::new(config.staging_ttl),
            otp: OtpGate::new(config.otp_ttl),
        }
    }

    /// Stage the signup and issue a verification code.
    ///
    /// Rejects before any side effect when the durable store already has the
    /// email. Staging again for the same email overwrites the prior record
    /// and reissues the code; only the latest code can verify.
    pub fn signup(&self, request: SignupRequest) -> Result<(), SignupError> {
        let email = normalize_email(&request.email);

        if self.accounts.find_by_email(&email)?.is_some() {
            return Err(SignupError::EmailAlreadyRegistered);
        }

        let password_hash = self.encoder.encode(&request.password)?;
        self.staging.stage(StagedSignup {
            name: request.name,
            email: email.clone(),
            password_hash,
            role: request.role,
        });

        let code = self.otp.issue(&email);
        self.mailer.send_code(&email, &code)?;
        info!(%email, "signup staged, verification code issued");
        Ok(())
    }

    /// Promote a staged signup into the durable store.
    ///
    /// The OTP must verify and the staged record must still be live. An OTP
    /// consumed against expired staging is not refunded; the applicant must
    /// restart signup. The token is issued only after the durable write
    /// committed, and both ephemeral records are gone afterwards.
    pub fn verify_otp(&self, email: &str, code: &str) -> Result<AuthSession, SignupError> {
        let email = normalize_email(email);

        if !self.otp.verify(&email, code) {
            return Err(SignupError::OtpInvalidOrExpired);
        }

        let Some(staged) = self.staging.fetch(&email) else {
            return Err(SignupError::StagingExpired);
        };

        let account = self.accounts.create(NewAccount {
            name: staged.name,
            email: email.clone(),
            password_hash: staged.password_hash,
            role: staged.role,
        })?;
        self.accounts.mark_verified(&email)?;
        self.staging.remove(&email);

        let token = self.tokens.issue(&email)?;
        info!(%email, "signup verified, account promoted");
        Ok(AuthSession {
            token,
            role: account.role,
            name: account.name,
            email: account.email,
        })
    }

    /// Email and password authentication against the durable store.
    pub fn login(&self, email: &str, password: &str) -> Result<AuthSession, SignupError> {
        let email = normalize_email(email);

        let Some(account) = self.accounts.find_by_email(&email)? else {
            return Err(SignupError::InvalidCredentials);
        };
        if !self.encoder.matches(password, &account.password_hash)? {
            return Err(SignupError::InvalidCredentials);
        }
        if !account.email_verified {
            return Err(SignupError::EmailNotVerified);
        }

        let token = self.tokens.issue(&email)?;
        Ok(AuthSession {
            token,
            role: account.role,
            name: account.name,
            email: account.email,
        })
    }
}

/// Error raised by the signup service.
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid or expired OTP")]
    OtpInvalidOrExpired,
    #[error("signup expired, please start again")]
    StagingExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email not verified")]
    EmailNotVerified,
    #[error(transparent)]
    Password(#[from] PasswordHashError),
    #[error(transparent)]
    Account(#[from] AccountStoreError),
    #[error(transparent)]
    Mail(#[from] MailerError),
    #[error(transparent)]
    Token(#[from] TokenError),
}
