//! Login page: email + password against the auth endpoint.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::net::auth::{AuthGateway, validate_login};
use crate::net::client::ApiClient;
use crate::net::http::BrowserTransport;
use crate::state::session::SessionPatch;
use crate::state::session_store::SessionStore;
use crate::util::task::spawn_in;

const UNREACHABLE_MESSAGE: &str = "Unable to reach the server. Please try again.";

/// Inline message shown for a failed sign-in or sign-up.
pub(crate) fn auth_failure_message(err: &AuthError) -> String {
    match err {
        AuthError::Transport(_) => UNREACHABLE_MESSAGE.to_owned(),
        other => other.to_string(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    let owner = Owner::current();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Arriving here ends any previous session.
    Effect::new(move || {
        store.update(|s| {
            s.update(SessionPatch::clear_tokens());
        });
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = match validate_login(&email.get_untracked(), &password.get_untracked()) {
            Ok(form) => form,
            Err(e) => {
                error.set(e.to_string());
                return;
            }
        };
        busy.set(true);
        error.set(String::new());

        let config = config.clone();
        let navigate = navigate.clone();
        let task = async move {
            let client = ApiClient::new(BrowserTransport, config);
            match AuthGateway::new(&client).login(&form).await {
                Ok(session) => {
                    leptos::logging::log!("signed in as {}", session.email);
                    store.update(|s| {
                        s.replace(session);
                    });
                    navigate("/", Default::default());
                }
                Err(e) => {
                    error.set(auth_failure_message(&e));
                    busy.set(false);
                }
            }
        };
        spawn_in(owner.as_ref(), task);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Chatdesk"</h1>
                <p class="login-card__subtitle">"Sign in"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || !error.get().is_empty()>
                    <p class="login-message login-message--error">{move || error.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "No account? "
                    <a href="/register">"Register"</a>
                </p>
            </div>
        </div>
    }
}
