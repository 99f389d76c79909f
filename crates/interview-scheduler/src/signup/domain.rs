use serde::{Deserialize, Serialize};

/// Closed role set for signed-up accounts.
///
/// Parsing from the wire string is total and rejecting: any value outside
/// the two canonical labels is an error, with no aliasing to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Interviewer,
    Applicant,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Interviewer => "INTERVIEWER",
            Role::Applicant => "APPLICANT",
        }
    }

    pub fn parse(value: &str) -> Result<Self, RoleParseError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INTERVIEWER" => Ok(Role::Interviewer),
            "APPLICANT" => Ok(Role::Applicant),
            _ => Err(RoleParseError(value.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = RoleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.label().to_string()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);

/// Signup payload as submitted by the applicant.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Not-yet-durable account data held in staging until the OTP verifies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSignup {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Authenticated session returned after promotion or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub role: Role,
    pub name: String,
    pub email: String,
}

/// Emails are keyed lowercase throughout the signup flow.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
