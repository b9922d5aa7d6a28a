//! Protected landing page for a signed-in user.
//!
//! On mount it confirms the session with the status endpoint (refreshing the
//! access token once if needed) and expires local credentials when the server
//! no longer accepts them; the unauth redirect then sends the user to login.
//! While mounted, preference changes made in the settings modal are pushed to
//! the server; a newer change aborts the previous in-flight push.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::session_client;
use crate::components::user_settings_modal::UserSettingsModal;
use crate::config::ApiConfig;
use crate::net::auth::AuthGateway;
use crate::net::types::WireSettings;
use crate::net::user::UserService;
use crate::state::session::Session;
use crate::state::session_store::SessionStore;
use crate::util::auth::{install_unauth_redirect, is_allowed};
use crate::util::task::spawn_scoped;

/// Greeting line for the signed-in user.
pub(crate) fn greeting(session: &Session) -> String {
    let who = [&session.name, &session.email]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty());
    match who {
        Some(who) => format!("Welcome, {who}"),
        None => "Welcome".to_owned(),
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let config = expect_context::<ApiConfig>();
    let settings_open = RwSignal::new(false);

    install_unauth_redirect(store, use_navigate());

    if store.with_untracked(|s| is_allowed(s.session())) {
        let config = config.clone();
        spawn_scoped(async move {
            let client = session_client(store, config);
            if !AuthGateway::new(&client).check_status().await {
                leptos::logging::warn!("session rejected by server; expiring credentials");
                store.update(SessionStore::expire_credentials);
            }
        });
    }

    let settings = Memo::new(move |_| store.with(|s| WireSettings::from_session(s.session())));
    Effect::new(move |synced: Option<()>| {
        settings.track();
        if synced.is_none() || !store.with_untracked(|s| is_allowed(s.session())) {
            return;
        }
        let session = store.with_untracked(|s| s.session().clone());
        let config = config.clone();
        spawn_scoped(async move {
            let client = session_client(store, config);
            if let Err(e) = UserService::new(&client).update_settings(&session).await {
                leptos::logging::warn!("{e}");
            }
        });
    });

    let on_logout = move |_| {
        store.update(SessionStore::logout);
    };

    view! {
        <Show when=move || store.with(|s| is_allowed(s.session()))>
            <div class="home-page">
                <header class="home-header">
                    <h1>{move || store.with(|s| greeting(s.session()))}</h1>
                    <div class="home-header__actions">
                        <button class="btn" on:click=move |_| settings_open.set(true)>"Settings"</button>
                        <button class="btn" on:click=on_logout>"Log out"</button>
                    </div>
                </header>
                <p class="home-page__domain">{move || store.with(|s| s.session().domain.clone())}</p>
            </div>
            <Show when=move || settings_open.get()>
                <UserSettingsModal on_close=Callback::new(move |()| settings_open.set(false))/>
            </Show>
        </Show>
    }
}
