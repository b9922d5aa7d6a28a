//! Login, registration, and token refresh.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages validate input with `validate_login`/`validate_register` before any
//! request is built, then call the gateway and hand the resulting `Session`
//! (or token patch) to the session store. The gateway never touches the store
//! itself.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::{AuthError, MIN_PASSWORD_LEN, ValidationError};
use crate::net::client::ApiClient;
use crate::net::http::{ApiRequest, ApiResponse, Transport};
use crate::net::types::{AuthData, Envelope, LoginRequest, RegisterRequest};
use crate::state::session::{Session, SessionPatch};

/// Trimmed, validated login input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Trimmed, validated registration input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterForm {
    pub domain: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Require both login fields.
///
/// # Errors
///
/// Returns `ValidationError::MissingLoginFields` if either field is blank.
pub fn validate_login(email: &str, password: &str) -> Result<LoginForm, ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingLoginFields);
    }
    Ok(LoginForm { email: email.to_owned(), password: password.to_owned() })
}

/// Require all four registration fields, a minimum password length, and a
/// matching confirmation, in that order.
///
/// # Errors
///
/// Returns the first `ValidationError` that applies.
pub fn validate_register(
    domain: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RegisterForm, ValidationError> {
    let domain = domain.trim();
    let email = email.trim();
    if domain.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingRegisterFields);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(RegisterForm {
        domain: domain.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        confirm_password: confirm_password.to_owned(),
    })
}

/// Live hints shown under the registration password fields while typing.
///
/// Empty inputs produce no hints.
pub fn password_hints(password: &str, confirm_password: &str) -> Vec<ValidationError> {
    let mut hints = Vec::new();
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LEN {
        hints.push(ValidationError::PasswordTooShort);
    }
    if !password.is_empty() && !confirm_password.is_empty() && password != confirm_password {
        hints.push(ValidationError::PasswordMismatch);
    }
    hints
}

/// Map a login/register payload into a complete session.
///
/// # Errors
///
/// Returns `AuthError::Decode` if the payload carries no user.
pub fn session_from_auth(data: AuthData) -> Result<Session, AuthError> {
    let user = data
        .user
        .ok_or_else(|| AuthError::Decode("response is missing user".to_owned()))?;
    let mut session = Session {
        access_token: Some(data.access_token),
        refresh_token: data.refresh_token,
        user_id: user.id,
        domain: user.domain,
        email: user.email,
        name: user.name,
        role: user.role,
        ..Session::default()
    };
    user.settings.apply_to(&mut session);
    Ok(session)
}

fn rejected(resp: &ApiResponse) -> AuthError {
    AuthError::Rejected {
        status: resp.status,
        message: resp.error_message(),
    }
}

/// Auth endpoint surface over a shared `ApiClient`.
#[derive(Debug)]
pub struct AuthGateway<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> AuthGateway<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// `POST {auth}/login`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the server message on a non-success
    /// status, or a transport/decode error.
    pub async fn login(&self, form: &LoginForm) -> Result<Session, AuthError> {
        let url = self.client.config().login_url();
        let request = ApiRequest::post(url).with_json(&LoginRequest {
            email: &form.email,
            password: &form.password,
        })?;
        self.exchange(request).await
    }

    /// `POST {auth}/register`.
    ///
    /// # Errors
    ///
    /// Same as `login`.
    pub async fn register(&self, form: &RegisterForm) -> Result<Session, AuthError> {
        let url = self.client.config().register_url();
        let request = ApiRequest::post(url).with_json(&RegisterRequest {
            domain: &form.domain,
            email: &form.email,
            password: &form.password,
            re_password: &form.confirm_password,
        })?;
        self.exchange(request).await
    }

    /// `POST {auth}/refresh`; yields a patch touching only the token fields.
    ///
    /// # Errors
    ///
    /// See `ApiClient::refresh`.
    pub async fn refresh(&self) -> Result<SessionPatch, AuthError> {
        let pair = self.client.refresh().await?;
        Ok(SessionPatch {
            access_token: Some(pair.access_token),
            refresh_token: Some(pair.refresh_token),
            ..SessionPatch::default()
        })
    }

    /// `GET {auth}/status`: whether the server still accepts the session.
    pub async fn check_status(&self) -> bool {
        let request = ApiRequest::get(self.client.config().status_url()).with_session_auth();
        match self.client.send(request).await {
            Ok(resp) => resp.is_success(),
            Err(e) => {
                leptos::logging::warn!("auth status check failed: {e}");
                false
            }
        }
    }

    async fn exchange(&self, request: ApiRequest) -> Result<Session, AuthError> {
        let resp = self.client.send(request).await?;
        if !resp.is_success() {
            return Err(rejected(&resp));
        }
        let envelope: Envelope<AuthData> = resp.json()?;
        session_from_auth(envelope.data)
    }
}
