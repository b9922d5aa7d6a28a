//! Mapping between `Session` fields and `localStorage` keys.
//!
//! DESIGN
//! ======
//! Every persisted field is one `Field` variant. A variant knows its storage
//! key, how to encode the current value (returning `None` for the field's
//! empty sentinel), and how to decode stored text back into the session.
//! The write rule is shared: a sentinel removes the key, anything else is
//! stored, so key presence always signals a non-default value.
//!
//! TRADE-OFFS
//! ==========
//! Unparseable stored values (bad numbers, malformed JSON) fall back to the
//! default rather than surfacing an error; a stale browser entry should never
//! block boot.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use crate::state::session::{GoogleSelectedDetail, Session, ThemePreference, speech_speed_in_range};
use crate::util::storage::KeyValueStore;

/// One persisted session field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    AccessToken,
    RefreshToken,
    UserId,
    Role,
    Domain,
    Email,
    Name,
    Theme,
    Model,
    Instructions,
    SpeechModel,
    SpeechVoice,
    SpeechSpeed,
    GoogleAccessToken,
    GoogleSelectedDetails,
    Tags,
}

/// Every persisted field, in boot read order.
pub const FIELDS: [Field; 16] = [
    Field::AccessToken,
    Field::RefreshToken,
    Field::UserId,
    Field::Role,
    Field::Domain,
    Field::Email,
    Field::Name,
    Field::Theme,
    Field::Model,
    Field::Instructions,
    Field::SpeechModel,
    Field::SpeechVoice,
    Field::SpeechSpeed,
    Field::GoogleAccessToken,
    Field::GoogleSelectedDetails,
    Field::Tags,
];

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn non_empty_opt(value: Option<&String>) -> Option<String> {
    value.and_then(|v| non_empty(v))
}

impl Field {
    /// Storage key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::AccessToken => "access_token",
            Self::RefreshToken => "refresh_token",
            Self::UserId => "user_id",
            Self::Role => "role",
            Self::Domain => "userDomain",
            Self::Email => "userEmail",
            Self::Name => "userName",
            Self::Theme => "theme",
            Self::Model => "defaultModel",
            Self::Instructions => "defaultInstructions",
            Self::SpeechModel => "defaultSpeechModel",
            Self::SpeechVoice => "defaultSpeechVoice",
            Self::SpeechSpeed => "defaultSpeechSpeed",
            Self::GoogleAccessToken => "googleAccessToken",
            Self::GoogleSelectedDetails => "googleSelectedDetails",
            Self::Tags => "tag",
        }
    }

    /// Storage text for the field's current value, or `None` for the sentinel.
    pub fn encode(self, session: &Session) -> Option<String> {
        match self {
            Self::AccessToken => non_empty_opt(session.access_token.as_ref()),
            Self::RefreshToken => non_empty_opt(session.refresh_token.as_ref()),
            Self::UserId => non_empty(&session.user_id),
            Self::Role => non_empty(&session.role),
            Self::Domain => non_empty(&session.domain),
            Self::Email => non_empty(&session.email),
            Self::Name => non_empty(&session.name),
            Self::Theme => Some(session.theme_preference.as_str().to_owned()),
            Self::Model => non_empty_opt(session.model.as_ref()),
            Self::Instructions => non_empty(&session.instructions),
            Self::SpeechModel => non_empty(&session.speech_model),
            Self::SpeechVoice => non_empty(&session.speech_voice),
            Self::SpeechSpeed => {
                speech_speed_in_range(session.speech_speed).then(|| session.speech_speed.to_string())
            }
            Self::GoogleAccessToken => non_empty(&session.google_access_token),
            Self::GoogleSelectedDetails => {
                if session.google_selected_details.is_empty() {
                    None
                } else {
                    serde_json::to_string(&session.google_selected_details).ok()
                }
            }
            Self::Tags => {
                let tags: Vec<&str> =
                    session.tags.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();
                (!tags.is_empty()).then(|| tags.join(","))
            }
        }
    }

    /// Parse stored text into `session`; unparseable text leaves the default.
    pub fn decode(self, session: &mut Session, raw: &str) {
        match self {
            Self::AccessToken => session.access_token = non_empty(raw),
            Self::RefreshToken => session.refresh_token = non_empty(raw),
            Self::UserId => assign_non_empty(&mut session.user_id, raw),
            Self::Role => assign_non_empty(&mut session.role, raw),
            Self::Domain => assign_non_empty(&mut session.domain, raw),
            Self::Email => assign_non_empty(&mut session.email, raw),
            Self::Name => assign_non_empty(&mut session.name, raw),
            Self::Theme => {
                if let Some(preference) = ThemePreference::parse(raw) {
                    session.theme_preference = preference;
                }
            }
            Self::Model => {
                if let Some(model) = non_empty(raw) {
                    session.model = Some(model);
                }
            }
            Self::Instructions => assign_non_empty(&mut session.instructions, raw),
            Self::SpeechModel => assign_non_empty(&mut session.speech_model, raw),
            Self::SpeechVoice => assign_non_empty(&mut session.speech_voice, raw),
            Self::SpeechSpeed => match raw.trim().parse::<f64>() {
                Ok(speed) if speech_speed_in_range(speed) => session.speech_speed = speed,
                _ => leptos::logging::warn!("ignoring stored speech speed: {raw:?}"),
            },
            Self::GoogleAccessToken => assign_non_empty(&mut session.google_access_token, raw),
            Self::GoogleSelectedDetails => match serde_json::from_str::<Vec<GoogleSelectedDetail>>(raw) {
                Ok(details) => session.google_selected_details = details,
                Err(e) => leptos::logging::warn!("ignoring stored sheet selection: {e}"),
            },
            Self::Tags => {
                session.tags = raw
                    .split(',')
                    .filter(|t| !t.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
        }
    }
}

fn assign_non_empty(slot: &mut String, raw: &str) {
    if !raw.is_empty() {
        raw.clone_into(slot);
    }
}

/// Write one field: remove the key for the sentinel, store otherwise.
pub fn write(store: &dyn KeyValueStore, field: Field, session: &Session) {
    match field.encode(session) {
        Some(value) => store.set(field.key(), &value),
        None => store.remove(field.key()),
    }
}

/// Read one field into `session`, keeping the current value when absent.
pub fn read(store: &dyn KeyValueStore, field: Field, session: &mut Session) {
    if let Some(raw) = store.get(field.key()) {
        field.decode(session, &raw);
    }
}

/// Write every field whose stored form differs between `before` and `after`.
///
/// Returns the fields that were written.
pub fn persist_changed(store: &dyn KeyValueStore, before: &Session, after: &Session) -> Vec<Field> {
    let changed: Vec<Field> = FIELDS
        .into_iter()
        .filter(|field| field.encode(before) != field.encode(after))
        .collect();
    for field in &changed {
        write(store, *field, after);
    }
    changed
}

/// Write every field unconditionally.
pub fn persist_all(store: &dyn KeyValueStore, session: &Session) {
    for field in FIELDS {
        write(store, field, session);
    }
}

/// Remove every persisted key.
pub fn clear_all(store: &dyn KeyValueStore) {
    for field in FIELDS {
        store.remove(field.key());
    }
}

/// Build a session from storage, starting from `defaults`.
pub fn load(store: &dyn KeyValueStore, defaults: Session) -> Session {
    let mut session = defaults;
    for field in FIELDS {
        read(store, field, &mut session);
    }
    session
}
