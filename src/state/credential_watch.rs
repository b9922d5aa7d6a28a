//! Periodic check that the stored access token still exists.
//!
//! SYSTEM CONTEXT
//! ==============
//! Another tab logging out (or the user clearing site data) removes the
//! `access_token` entry behind this tab's back. The watch notices within one
//! poll interval and expires the in-memory credentials so route guards send
//! the user to `/login`.

#[cfg(test)]
#[path = "credential_watch_test.rs"]
mod credential_watch_test;

use leptos::prelude::*;

use crate::state::persistence::Field;
use crate::state::session::Session;
use crate::state::session_store::SessionStore;
use crate::util::storage::{KeyValueStore, SharedStore};

/// Whether the session holds a token that storage no longer has.
pub fn credentials_revoked(session: &Session, stored_access_token: Option<&str>) -> bool {
    session.has_access_token() && stored_access_token.is_none_or(str::is_empty)
}

/// Run one check against `storage`, expiring credentials if revoked.
///
/// Returns whether the store was changed.
pub fn check_once(store: &mut SessionStore, storage: &dyn KeyValueStore) -> bool {
    let stored = storage.get(Field::AccessToken.key());
    if !credentials_revoked(store.session(), stored.as_deref()) {
        return false;
    }
    leptos::logging::log!("access token removed from storage; expiring session");
    store.expire_credentials();
    true
}

/// Poll storage every `CREDENTIAL_POLL_INTERVAL` until the owning scope is cleaned up.
pub fn install_credential_watch(store: RwSignal<SessionStore>, storage: SharedStore) {
    #[cfg(feature = "hydrate")]
    {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let alive = Arc::new(AtomicBool::new(true));
        let alive_task = alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(crate::config::CREDENTIAL_POLL_INTERVAL).await;
                if !alive_task.load(Ordering::Relaxed) {
                    break;
                }
                let stored = storage.get(Field::AccessToken.key());
                let revoked = store.with_untracked(|s| credentials_revoked(s.session(), stored.as_deref()));
                if revoked {
                    store.update(|s| {
                        check_once(s, storage.as_ref());
                    });
                }
            }
        });
        on_cleanup(move || alive.store(false, Ordering::Relaxed));
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (store, storage);
    }
}
