//! Session store: the single owner of the current `Session`.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds one store at boot and provides it as `RwSignal<SessionStore>`;
//! the signal is the change notification for every subscriber (route guards,
//! settings modal, theme effect). Every mutation goes through `commit`, which
//! resolves the effective theme, mirrors changed fields to storage, and swaps
//! the whole session.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::fmt;

use crate::state::persistence;
use crate::state::session::{Session, SessionPatch, effective_theme};
use crate::util::storage::SharedStore;

#[derive(Clone)]
pub struct SessionStore {
    session: Session,
    storage: SharedStore,
    os_prefers_dark: bool,
    revision: u64,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("os_prefers_dark", &self.os_prefers_dark)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Load the session from `storage` and resolve the theme against the OS.
    pub fn initialize(storage: SharedStore, os_prefers_dark: bool) -> Self {
        let mut session = persistence::load(storage.as_ref(), Session::default());
        session.effective_theme = effective_theme(session.theme_preference, os_prefers_dark);
        Self {
            session,
            storage,
            os_prefers_dark,
            revision: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Number of committed changes since boot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn os_prefers_dark(&self) -> bool {
        self.os_prefers_dark
    }

    /// Apply a partial update and persist whatever changed.
    pub fn update(&mut self, patch: SessionPatch) -> &Session {
        let next = self.session.apply(patch);
        self.commit(next)
    }

    /// Swap in a whole session, e.g. one mapped from a login response.
    pub fn replace(&mut self, session: Session) -> &Session {
        self.commit(session)
    }

    /// Follow an OS color-scheme change when the preference is `System`.
    ///
    /// Returns whether the effective theme changed.
    pub fn on_os_theme_change(&mut self, is_dark: bool) -> bool {
        self.os_prefers_dark = is_dark;
        let resolved = effective_theme(self.session.theme_preference, is_dark);
        if resolved == self.session.effective_theme {
            return false;
        }
        self.session.effective_theme = resolved;
        self.revision += 1;
        true
    }

    /// Drop tokens while keeping identity and preferences.
    pub fn expire_credentials(&mut self) {
        if self.session.access_token.is_none() && self.session.refresh_token.is_none() {
            return;
        }
        self.update(SessionPatch::clear_tokens());
    }

    /// Reset to defaults and remove every persisted key; the OS signal is kept.
    pub fn logout(&mut self) {
        persistence::clear_all(self.storage.as_ref());
        let mut next = Session::default();
        next.effective_theme = effective_theme(next.theme_preference, self.os_prefers_dark);
        self.session = next;
        self.revision += 1;
        leptos::logging::log!("session cleared");
    }

    fn commit(&mut self, mut next: Session) -> &Session {
        next.effective_theme = effective_theme(next.theme_preference, self.os_prefers_dark);
        let written = persistence::persist_changed(self.storage.as_ref(), &self.session, &next);
        if !written.is_empty() {
            leptos::logging::log!("session persisted {} field(s)", written.len());
        }
        self.session = next;
        self.revision += 1;
        &self.session
    }
}
