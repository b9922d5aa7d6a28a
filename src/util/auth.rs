//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected route components apply identical unauthenticated redirect
//! behavior; the guard reads only the access token held by the session store.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::Session;
use crate::state::session_store::SessionStore;

/// Route to send unauthenticated visitors to.
pub const LOGIN_PATH: &str = "/login";

/// Whether `session` may view a protected route.
pub fn is_allowed(session: &Session) -> bool {
    session.has_access_token()
}

/// Redirect to `/login` whenever the session loses its access token.
pub fn install_unauth_redirect<F>(store: RwSignal<SessionStore>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let allowed = store.with(|s| is_allowed(s.session()));
        if !allowed {
            navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
