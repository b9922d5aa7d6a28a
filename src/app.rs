//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ApiConfig;
use crate::net::client::{ApiClient, TokenPair};
use crate::pages::{home::HomePage, login::LoginPage, register::RegisterPage};
use crate::state::credential_watch::install_credential_watch;
use crate::state::session::SessionPatch;
use crate::state::session_store::SessionStore;
use crate::util::dark_mode;
use crate::util::storage::{BrowserStorage, SharedStore};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Loads the session from `localStorage`, provides it as
/// `RwSignal<SessionStore>` together with the `ApiConfig`, keeps the document
/// theme in sync, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let storage: SharedStore = Arc::new(BrowserStorage);
    let store = RwSignal::new(SessionStore::initialize(storage.clone(), dark_mode::os_prefers_dark()));
    provide_context(store);
    provide_context(ApiConfig::default());

    Effect::new(move || dark_mode::apply(store.with(|s| s.session().effective_theme)));

    let os_watch = dark_mode::watch_os_theme(move |is_dark| {
        store.maybe_update(|s| s.on_os_theme_change(is_dark));
    });
    // Dropped with the owner, which deregisters the listener.
    StoredValue::new_local(os_watch);

    install_credential_watch(store, storage);

    view! {
        <Stylesheet id="leptos" href="/pkg/chatdesk.css"/>
        <Title text="Chatdesk"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}

/// Browser client that reads its tokens from `store` and writes refreshed
/// tokens back into it, so a refresh done by one task is reused by others.
pub(crate) fn session_client(store: RwSignal<SessionStore>, config: ApiConfig) -> ApiClient {
    let session = store.with_untracked(|s| s.session().clone());
    ApiClient::for_session(config, &session)
        .with_token_source(move || store.with_untracked(|s| TokenPair::from_session(s.session())))
        .with_token_listener(move |pair| {
            let patch = SessionPatch {
                access_token: Some(pair.access_token.clone()),
                refresh_token: Some(pair.refresh_token.clone()),
                ..SessionPatch::default()
            };
            store.update(|s| {
                s.update(patch);
            });
        })
}
