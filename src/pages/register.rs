//! Registration page: domain, email, and a confirmed password.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::config::ApiConfig;
use crate::net::auth::{AuthGateway, password_hints, validate_register};
use crate::net::client::ApiClient;
use crate::net::http::BrowserTransport;
use crate::net::types::DomainOption;
use crate::net::user::{UserService, fallback_domains};
use crate::pages::login::auth_failure_message;
use crate::state::session_store::SessionStore;
use crate::util::task::{spawn_in, spawn_scoped};

/// Keep `current` when it is still offered, otherwise preselect the first domain.
pub(crate) fn preselect_domain(domains: &[DomainOption], current: &str) -> String {
    if domains.iter().any(|d| d.name == current) {
        return current.to_owned();
    }
    domains.first().map(|d| d.name.clone()).unwrap_or_default()
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let config = expect_context::<ApiConfig>();
    let navigate = use_navigate();
    let owner = Owner::current();

    let domains = RwSignal::new(fallback_domains());
    let domain = RwSignal::new(preselect_domain(&fallback_domains(), ""));
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    {
        let config = config.clone();
        spawn_scoped(async move {
            let client = ApiClient::new(BrowserTransport, config);
            let list = UserService::new(&client).fetch_domains().await;
            domain.update(|d| {
                let next = preselect_domain(&list, d);
                *d = next;
            });
            domains.set(list);
        });
    }

    let hints = move || {
        password.with(|p| confirm.with(|c| password_hints(p, c)))
            .into_iter()
            .map(|hint| view! { <li class="register-hint">{hint.to_string()}</li> })
            .collect_view()
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let form = match validate_register(
            &domain.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        ) {
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
        spawn_in(owner.as_ref(), async move {
            let client = ApiClient::new(BrowserTransport, config);
            match AuthGateway::new(&client).register(&form).await {
                Ok(session) => {
                    leptos::logging::log!("registered {} in {}", session.email, session.domain);
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
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Chatdesk"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    <select
                        class="login-input"
                        prop:value=move || domain.get()
                        on:change=move |ev| domain.set(event_target_value(&ev))
                    >
                        <For
                            each=move || domains.get()
                            key=|d| d.name.clone()
                            children=move |d| {
                                let selected = d.name.clone();
                                view! {
                                    <option value=d.name.clone() selected=move || domain.get() == selected>
                                        {d.label}
                                    </option>
                                }
                            }
                        />
                    </select>
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
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Re-enter password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <ul class="register-hints">{hints}</ul>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Register" }}
                    </button>
                </form>
                <Show when=move || !error.get().is_empty()>
                    <p class="login-message login-message--error">{move || error.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
