//! Session record for the current browser user.
//!
//! DESIGN
//! ======
//! `Session` is a plain value: every change produces a new `Session` through
//! `Session::apply`, and the store swaps it in whole. Field defaults match what
//! a fresh browser with empty storage should show.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::net::types::deserialize_string_from_any;

/// Default text-to-speech model.
pub const DEFAULT_SPEECH_MODEL: &str = "tts-1";
/// Default text-to-speech voice.
pub const DEFAULT_SPEECH_VOICE: &str = "echo";
/// Default playback speed multiplier.
pub const DEFAULT_SPEECH_SPEED: f64 = 1.0;
/// Inclusive lower bound for speech speed.
pub const MIN_SPEECH_SPEED: f64 = 0.25;
/// Inclusive upper bound for speech speed.
pub const MAX_SPEECH_SPEED: f64 = 4.0;

/// Whether `speed` is a storable speech speed.
pub fn speech_speed_in_range(speed: f64) -> bool {
    (MIN_SPEECH_SPEED..=MAX_SPEECH_SPEED).contains(&speed)
}

/// Theme the user picked in settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Parse a stored preference; unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Concrete rendering mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_os_signal(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }
}

/// Resolve the rendering mode from the preference and the OS signal.
pub fn effective_theme(preference: ThemePreference, os_prefers_dark: bool) -> Theme {
    match preference {
        ThemePreference::Light => Theme::Light,
        ThemePreference::Dark => Theme::Dark,
        ThemePreference::System => Theme::from_os_signal(os_prefers_dark),
    }
}

/// One linked spreadsheet tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSelectedDetail {
    /// Tab id within the spreadsheet.
    #[serde(deserialize_with = "deserialize_string_from_any")]
    pub id: String,
    /// Spreadsheet file id.
    pub sheet_id: String,
    /// Spreadsheet file name.
    pub sheet_name: String,
    /// Tab title.
    pub title: String,
}

/// Credentials, identity, and preferences of the current user.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: String,
    pub domain: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub theme_preference: ThemePreference,
    pub effective_theme: Theme,
    pub model: Option<String>,
    pub instructions: String,
    pub speech_model: String,
    pub speech_voice: String,
    pub speech_speed: f64,
    pub google_access_token: String,
    pub google_selected_details: Vec<GoogleSelectedDetail>,
    pub tags: Vec<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            user_id: String::new(),
            domain: String::new(),
            email: String::new(),
            name: String::new(),
            role: String::new(),
            theme_preference: ThemePreference::System,
            effective_theme: Theme::Light,
            model: None,
            instructions: String::new(),
            speech_model: DEFAULT_SPEECH_MODEL.to_owned(),
            speech_voice: DEFAULT_SPEECH_VOICE.to_owned(),
            speech_speed: DEFAULT_SPEECH_SPEED,
            google_access_token: String::new(),
            google_selected_details: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl Session {
    /// Whether a non-empty access token is held.
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Build a new session with the fields named in `patch` replaced.
    ///
    /// The effective theme is not re-derived here; the store owns the OS
    /// signal and resolves it after applying.
    #[must_use]
    pub fn apply(&self, patch: SessionPatch) -> Self {
        let mut next = self.clone();
        if let Some(v) = patch.access_token {
            next.access_token = v;
        }
        if let Some(v) = patch.refresh_token {
            next.refresh_token = v;
        }
        if let Some(v) = patch.user_id {
            next.user_id = v;
        }
        if let Some(v) = patch.domain {
            next.domain = v;
        }
        if let Some(v) = patch.email {
            next.email = v;
        }
        if let Some(v) = patch.name {
            next.name = v;
        }
        if let Some(v) = patch.role {
            next.role = v;
        }
        if let Some(v) = patch.theme_preference {
            next.theme_preference = v;
        }
        if let Some(v) = patch.model {
            next.model = v;
        }
        if let Some(v) = patch.instructions {
            next.instructions = v;
        }
        if let Some(v) = patch.speech_model {
            next.speech_model = v;
        }
        if let Some(v) = patch.speech_voice {
            next.speech_voice = v;
        }
        if let Some(v) = patch.speech_speed {
            next.speech_speed = v;
        }
        if let Some(v) = patch.google_access_token {
            next.google_access_token = v;
        }
        if let Some(v) = patch.google_selected_details {
            next.google_selected_details = v;
        }
        if let Some(v) = patch.tags {
            next.tags = v;
        }
        next
    }
}

/// Partial update: `None` leaves a field untouched.
///
/// Optional fields use a nested `Option` so a patch can clear them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionPatch {
    pub access_token: Option<Option<String>>,
    pub refresh_token: Option<Option<String>>,
    pub user_id: Option<String>,
    pub domain: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub theme_preference: Option<ThemePreference>,
    pub model: Option<Option<String>>,
    pub instructions: Option<String>,
    pub speech_model: Option<String>,
    pub speech_voice: Option<String>,
    pub speech_speed: Option<f64>,
    pub google_access_token: Option<String>,
    pub google_selected_details: Option<Vec<GoogleSelectedDetail>>,
    pub tags: Option<Vec<String>>,
}

impl SessionPatch {
    /// Patch that sets both tokens.
    pub fn tokens(access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token: Some(Some(access_token)),
            refresh_token: Some(refresh_token),
            ..Self::default()
        }
    }

    /// Patch that clears both tokens.
    pub fn clear_tokens() -> Self {
        Self {
            access_token: Some(None),
            refresh_token: Some(None),
            ..Self::default()
        }
    }

    pub fn theme(preference: ThemePreference) -> Self {
        Self { theme_preference: Some(preference), ..Self::default() }
    }
}
