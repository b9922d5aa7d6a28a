//! Error taxonomy for client actions.
//!
//! ERROR HANDLING
//! ==============
//! `ValidationError` blocks a submission before any request is built.
//! `ApiError` covers transport and codec failures of the shared client, and
//! `AuthError` is what login/register/refresh surface to the page. Storage
//! failures are not modeled: persistence is best-effort and only logged.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Minimum accepted password length on the registration form.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Client-side form validation failures, rendered inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingLoginFields,
    #[error("Domain, email, password and re-password are required")]
    MissingRegisterFields,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords must match")]
    PasswordMismatch,
}

/// Failures of the shared HTTP client below the status-code level.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (network, CORS, SSR stub).
    #[error("request failed: {0}")]
    Transport(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The response body did not match the expected schema.
    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Failures of login, registration, and token refresh.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No response was received.
    #[error("network error: {0}")]
    Transport(String),

    /// A success response could not be mapped into a session.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A refresh was requested without a stored refresh token.
    #[error("no refresh token available")]
    MissingRefreshToken,
}

impl AuthError {
    /// HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Transport(message) => Self::Transport(message),
            ApiError::Encode(message) | ApiError::Decode(message) => Self::Decode(message),
        }
    }
}
