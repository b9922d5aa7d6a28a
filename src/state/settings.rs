//! Local state and pure helpers for the user-settings modal.
//!
//! DESIGN
//! ======
//! The modal keeps its tab, draft text, sheet selection, and storage estimate
//! here so formatting and selection rules can be tested without a DOM.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use crate::state::session::{GoogleSelectedDetail, SessionPatch};

/// Label shown when a storage figure is unavailable.
pub const NOT_APPLICABLE: &str = "N/A";

/// Speech speed slider step.
pub const SPEECH_SPEED_STEP: f64 = 0.05;

/// Text-to-speech models offered in the General tab.
pub const SPEECH_MODELS: [&str; 2] = ["tts-1", "tts-1-hd"];

/// Text-to-speech voices as `(value, label)`.
pub const SPEECH_VOICES: [(&str, &str); 6] = [
    ("alloy", "Alloy"),
    ("echo", "Echo"),
    ("fable", "Fable"),
    ("onyx", "Onyx"),
    ("nova", "Nova"),
    ("shimmer", "Shimmer"),
];

/// Settings modal tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SettingsTab {
    #[default]
    General,
    Instructions,
    Google,
    Storage,
}

impl SettingsTab {
    pub const ALL: [Self; 4] = [Self::General, Self::Instructions, Self::Google, Self::Storage];

    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Instructions => "Instructions",
            Self::Google => "Google Connect",
            Self::Storage => "Storage",
        }
    }
}

/// Browser storage usage as reported by `navigator.storage.estimate()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StorageEstimate {
    pub usage: Option<f64>,
    pub quota: Option<f64>,
}

impl StorageEstimate {
    /// Percentage of quota used, when both figures are known and quota is positive.
    pub fn percentage_used(&self) -> Option<f64> {
        match (self.usage, self.quota) {
            (Some(usage), Some(quota)) if quota > 0.0 => Some(usage / quota * 100.0),
            _ => None,
        }
    }
}

/// Render a byte count as megabytes with two decimals.
pub fn format_bytes_to_mb(bytes: Option<f64>) -> String {
    bytes.map_or_else(|| NOT_APPLICABLE.to_owned(), |b| format!("{:.2} MB", b / 1024.0 / 1024.0))
}

/// Render a percentage with two decimals.
pub fn format_percentage(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_APPLICABLE.to_owned(), |v| format!("{v:.2}%"))
}

/// Case-insensitive substring filter over linked tabs by sheet name or tab title.
pub fn filter_details<'a>(details: &'a [GoogleSelectedDetail], query: &str) -> Vec<&'a GoogleSelectedDetail> {
    let needle = query.to_lowercase();
    details
        .iter()
        .filter(|d| d.sheet_name.to_lowercase().contains(&needle) || d.title.to_lowercase().contains(&needle))
        .collect()
}

/// Add `detail` if no entry with the same tab id exists, otherwise remove it.
#[must_use]
pub fn toggle_detail(selected: &[GoogleSelectedDetail], detail: GoogleSelectedDetail) -> Vec<GoogleSelectedDetail> {
    if selected.iter().any(|d| d.id == detail.id) {
        selected.iter().filter(|d| d.id != detail.id).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(detail);
        next
    }
}

/// Parse the slider's text value, clamping to the accepted speed range.
pub fn parse_speech_speed(raw: &str) -> Option<f64> {
    use crate::state::session::{MAX_SPEECH_SPEED, MIN_SPEECH_SPEED};

    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then(|| value.clamp(MIN_SPEECH_SPEED, MAX_SPEECH_SPEED))
}

/// Parse a comma-separated tag input into trimmed, non-empty tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Model field input; blank selects the server default.
pub fn model_from_input(raw: &str) -> Option<String> {
    let model = raw.trim();
    (!model.is_empty()).then(|| model.to_owned())
}

/// Status line after `PUT {user}/google`.
pub fn google_save_message(status: u16) -> String {
    if (200..300).contains(&status) {
        "Google settings saved".to_owned()
    } else {
        format!("Google update failed: {status}")
    }
}

/// Tags as shown in the tag input.
pub fn format_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Patch for an edited tag input, or `None` when the parsed tags are unchanged.
pub fn tags_patch(current: &[String], raw: &str) -> Option<SessionPatch> {
    let tags = parse_tags(raw);
    (tags != current).then(|| SessionPatch { tags: Some(tags), ..SessionPatch::default() })
}
