//! Wire DTOs for the auth and user REST endpoints.
//!
//! DESIGN
//! ======
//! Response types are lenient (`#[serde(default)]` on everything optional)
//! because older accounts come back with partial `settings` objects. Request
//! types borrow their fields so building a body never clones credentials.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::state::session::{GoogleSelectedDetail, Session, ThemePreference};

/// `{ "data": ... }` wrapper used by every endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Error body; only `message` is surfaced.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub domain: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub re_password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Payload of login, register, and refresh responses.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Present on login/register, absent on refresh.
    #[serde(default)]
    pub user: Option<WireUser>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WireUser {
    #[serde(deserialize_with = "deserialize_string_from_any")]
    pub id: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub settings: WireSettings,
}

/// Server-side copy of the user's preferences.
///
/// Also the body of `PUT {user}/settings`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireSettings {
    #[serde(deserialize_with = "deserialize_theme_lenient")]
    pub user_theme: Option<ThemePreference>,
    pub model: Option<String>,
    pub instructions: Option<String>,
    pub speech_model: Option<String>,
    pub speech_voice: Option<String>,
    pub speech_speed: Option<f64>,
    pub google_access_token: Option<String>,
    pub google_selected_details: Option<Vec<GoogleSelectedDetail>>,
    pub tags: Option<Vec<String>>,
}

impl WireSettings {
    /// Snapshot the preference fields of `session`.
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_theme: Some(session.theme_preference),
            model: session.model.clone(),
            instructions: Some(session.instructions.clone()),
            speech_model: Some(session.speech_model.clone()),
            speech_voice: Some(session.speech_voice.clone()),
            speech_speed: Some(session.speech_speed),
            google_access_token: Some(session.google_access_token.clone()),
            google_selected_details: Some(session.google_selected_details.clone()),
            tags: Some(session.tags.clone()),
        }
    }

    /// Overlay the fields the server sent onto `session`.
    pub fn apply_to(&self, session: &mut Session) {
        if let Some(theme) = self.user_theme {
            session.theme_preference = theme;
        }
        if let Some(model) = &self.model {
            session.model = (!model.is_empty()).then(|| model.clone());
        }
        if let Some(instructions) = &self.instructions {
            session.instructions.clone_from(instructions);
        }
        if let Some(speech_model) = self.speech_model.as_ref().filter(|m| !m.is_empty()) {
            session.speech_model.clone_from(speech_model);
        }
        if let Some(speech_voice) = self.speech_voice.as_ref().filter(|v| !v.is_empty()) {
            session.speech_voice.clone_from(speech_voice);
        }
        if let Some(speed) = self.speech_speed {
            session.speech_speed = speed;
        }
        if let Some(token) = &self.google_access_token {
            session.google_access_token.clone_from(token);
        }
        if let Some(details) = &self.google_selected_details {
            session.google_selected_details.clone_from(details);
        }
        if let Some(tags) = &self.tags {
            session.tags.clone_from(tags);
        }
    }
}

/// Body of `PUT {user}/google`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleUpdateRequest<'a> {
    pub google_access_token: &'a str,
    pub google_selected_details: &'a [GoogleSelectedDetail],
    pub update_data: bool,
}

/// Result of `PUT {user}/google`: the raw `data` plus the HTTP status.
#[derive(Clone, Debug, PartialEq)]
pub struct GoogleUpdateResult {
    pub data: serde_json::Value,
    pub status: u16,
}

/// One selectable tenant domain on the registration form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DomainOption {
    pub name: String,
    pub label: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DomainListResponse {
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub data: Vec<DomainOption>,
}

/// Accept a JSON string or number and yield its string form.
pub(crate) fn deserialize_string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number")),
    }
}

/// Accept any `userTheme` value; unknown or non-string values read as unset.
fn deserialize_theme_lenient<'de, D>(deserializer: D) -> Result<Option<ThemePreference>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(ThemePreference::parse))
}
