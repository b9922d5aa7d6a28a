//! User settings, Google link, and domain list endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Settings writes return `Result<(), String>` with a user-facing message, the
//! same shape the pages already render inline. The Google update returns the
//! raw status alongside the data because the modal reports non-200 answers
//! without treating them as transport failures.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use crate::net::client::ApiClient;
use crate::net::http::{ApiRequest, Transport};
use crate::net::types::{DomainListResponse, DomainOption, GoogleUpdateRequest, GoogleUpdateResult, WireSettings};
use crate::state::session::{GoogleSelectedDetail, Session};

/// Domains offered when the domain list endpoint is unavailable.
pub fn fallback_domains() -> Vec<DomainOption> {
    vec![
        DomainOption { name: "domain-1".to_owned(), label: "Domain #001".to_owned() },
        DomainOption { name: "domain-2".to_owned(), label: "Domain #002".to_owned() },
    ]
}

fn settings_update_failed_message(status: u16) -> String {
    format!("settings update failed: {status}")
}

#[derive(Debug)]
pub struct UserService<'a, T: Transport> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> UserService<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// `PUT {user}/settings` with the session's full preference object.
    ///
    /// # Errors
    ///
    /// Returns a display string on transport failure or a non-success status.
    pub async fn update_settings(&self, session: &Session) -> Result<(), String> {
        let request = ApiRequest::put(self.client.config().settings_url())
            .with_json(&WireSettings::from_session(session))
            .map_err(|e| e.to_string())?
            .with_session_auth();
        let resp = self.client.send(request).await.map_err(|e| e.to_string())?;
        if !resp.is_success() {
            return Err(settings_update_failed_message(resp.status));
        }
        Ok(())
    }

    /// `PUT {user}/google` with the linked token and sheet tabs.
    ///
    /// # Errors
    ///
    /// Returns a display string only when no response was received or the
    /// body was not JSON; non-success statuses are reported in the result.
    pub async fn update_google(
        &self,
        google_access_token: &str,
        google_selected_details: &[GoogleSelectedDetail],
        update_data: bool,
    ) -> Result<GoogleUpdateResult, String> {
        let request = ApiRequest::put(self.client.config().google_url())
            .with_json(&GoogleUpdateRequest {
                google_access_token,
                google_selected_details,
                update_data,
            })
            .map_err(|e| e.to_string())?
            .with_session_auth();
        let resp = self.client.send(request).await.map_err(|e| e.to_string())?;
        let body: serde_json::Value = if resp.body.trim().is_empty() {
            serde_json::Value::Null
        } else {
            resp.json().map_err(|e| e.to_string())?
        };
        Ok(GoogleUpdateResult {
            data: body.get("data").cloned().unwrap_or(serde_json::Value::Null),
            status: resp.status,
        })
    }

    /// `GET {domains}`; falls back to the static list on any failure.
    pub async fn fetch_domains(&self) -> Vec<DomainOption> {
        let request = ApiRequest::get(self.client.config().domains_endpoint.clone());
        let list = match self.client.send(request).await {
            Ok(resp) if resp.is_success() => resp.json::<DomainListResponse>().ok(),
            Ok(resp) => {
                leptos::logging::warn!("domain list request failed: {}", resp.status);
                None
            }
            Err(e) => {
                leptos::logging::warn!("domain list request failed: {e}");
                None
            }
        };
        match list {
            Some(list) if !list.data.is_empty() => list.data,
            _ => fallback_domains(),
        }
    }
}
