//! Modal for editing the current user's preferences.
//!
//! Every edit is committed to the session store immediately, except the
//! instructions draft which is committed when the modal closes. Pushing the
//! changed preferences to the server is the hosting page's concern.

use leptos::prelude::*;

use crate::app::session_client;
use crate::config::ApiConfig;
use crate::net::user::UserService;
use crate::state::session::{
    GoogleSelectedDetail, MAX_SPEECH_SPEED, MIN_SPEECH_SPEED, SessionPatch, ThemePreference,
};
use crate::state::session_store::SessionStore;
use crate::state::settings::{
    SPEECH_MODELS, SPEECH_SPEED_STEP, SPEECH_VOICES, SettingsTab, StorageEstimate, filter_details,
    format_bytes_to_mb, format_percentage, format_tags, google_save_message, model_from_input,
    parse_speech_speed, tags_patch, toggle_detail,
};
use crate::util::task::{spawn_in, spawn_scoped};

#[cfg(feature = "hydrate")]
async fn estimate_storage() -> StorageEstimate {
    use wasm_bindgen::JsValue;

    let Some(window) = web_sys::window() else {
        return StorageEstimate::default();
    };
    let Ok(promise) = window.navigator().storage().estimate() else {
        return StorageEstimate::default();
    };
    let Ok(value) = wasm_bindgen_futures::JsFuture::from(promise).await else {
        leptos::logging::warn!("storage estimate unavailable");
        return StorageEstimate::default();
    };
    let field = |name: &str| {
        js_sys::Reflect::get(&value, &JsValue::from_str(name))
            .ok()
            .and_then(|v| v.as_f64())
    };
    StorageEstimate { usage: field("usage"), quota: field("quota") }
}

#[cfg(not(feature = "hydrate"))]
async fn estimate_storage() -> StorageEstimate {
    StorageEstimate::default()
}

fn patch_store(store: RwSignal<SessionStore>, patch: SessionPatch) {
    store.update(|s| {
        s.update(patch);
    });
}

/// Tabbed settings dialog. Closes on Escape, backdrop click, or the Close button.
#[component]
pub fn UserSettingsModal(on_close: Callback<()>) -> impl IntoView {
    let store = expect_context::<RwSignal<SessionStore>>();
    let tab = RwSignal::new(SettingsTab::default());
    let instructions = RwSignal::new(store.with_untracked(|s| s.session().instructions.clone()));

    let close = move || {
        let draft = instructions.get_untracked();
        if store.with_untracked(|s| s.session().instructions != draft) {
            patch_store(store, SessionPatch { instructions: Some(draft), ..SessionPatch::default() });
        }
        on_close.run(());
    };

    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            close();
        }
    };

    let tabs = SettingsTab::ALL
        .into_iter()
        .map(|t| {
            view! {
                <button
                    class="settings-tab"
                    class:settings-tab--active=move || tab.get() == t
                    on:click=move |_| tab.set(t)
                >
                    {t.label()}
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="dialog-backdrop" on:click=move |_| close()>
            <div
                class="dialog dialog--settings"
                on:click=move |ev| ev.stop_propagation()
                on:keydown=on_keydown
                tabindex="0"
            >
                <h2>"Settings"</h2>
                <nav class="settings-tabs">{tabs}</nav>
                <div class="settings-panel">
                    {move || match tab.get() {
                        SettingsTab::General => view! { <GeneralTab store/> }.into_any(),
                        SettingsTab::Instructions => view! { <InstructionsTab instructions/> }.into_any(),
                        SettingsTab::Google => view! { <GoogleTab store/> }.into_any(),
                        SettingsTab::Storage => view! { <StorageTab/> }.into_any(),
                    }}
                </div>
                <div class="dialog__actions">
                    <button class="btn btn--primary" on:click=move |_| close()>"Close"</button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn GeneralTab(store: RwSignal<SessionStore>) -> impl IntoView {
    let session = move || store.with(|s| s.session().clone());

    let on_theme = move |ev: leptos::ev::Event| {
        if let Some(pref) = ThemePreference::parse(&event_target_value(&ev)) {
            patch_store(store, SessionPatch::theme(pref));
        }
    };
    let on_model = move |ev: leptos::ev::Event| {
        let model = model_from_input(&event_target_value(&ev));
        patch_store(store, SessionPatch { model: Some(model), ..SessionPatch::default() });
    };
    let on_speech_model = move |ev: leptos::ev::Event| {
        patch_store(store, SessionPatch { speech_model: Some(event_target_value(&ev)), ..SessionPatch::default() });
    };
    let on_voice = move |ev: leptos::ev::Event| {
        patch_store(store, SessionPatch { speech_voice: Some(event_target_value(&ev)), ..SessionPatch::default() });
    };
    let on_tags = move |ev: leptos::ev::Event| {
        let raw = event_target_value(&ev);
        if let Some(patch) = store.with_untracked(|s| tags_patch(&s.session().tags, &raw)) {
            patch_store(store, patch);
        }
    };
    let on_speed = move |ev: leptos::ev::Event| {
        if let Some(speed) = parse_speech_speed(&event_target_value(&ev)) {
            patch_store(store, SessionPatch { speech_speed: Some(speed), ..SessionPatch::default() });
        }
    };

    view! {
        <div class="settings-row">
            <label for="theme">"Theme"</label>
            <select id="theme" prop:value=move || session().theme_preference.as_str() on:change=on_theme>
                <option value="dark">"Dark"</option>
                <option value="light">"Light"</option>
                <option value="system">"System"</option>
            </select>
        </div>
        <div class="settings-row">
            <label for="model">"Model"</label>
            <input
                id="model"
                type="text"
                placeholder="Default"
                prop:value=move || session().model.unwrap_or_default()
                on:change=on_model
            />
        </div>
        <div class="settings-row">
            <label for="speech-model">"Speech model"</label>
            <select id="speech-model" prop:value=move || session().speech_model on:change=on_speech_model>
                {SPEECH_MODELS.into_iter().map(|m| view! { <option value=m>{m}</option> }).collect_view()}
            </select>
        </div>
        <div class="settings-row">
            <label for="voice">"Voice"</label>
            <select id="voice" prop:value=move || session().speech_voice on:change=on_voice>
                {SPEECH_VOICES
                    .into_iter()
                    .map(|(value, label)| view! { <option value=value>{label}</option> })
                    .collect_view()}
            </select>
        </div>
        <div class="settings-row">
            <label for="speed">"Speed"</label>
            <input
                id="speed"
                type="range"
                min=MIN_SPEECH_SPEED
                max=MAX_SPEECH_SPEED
                step=SPEECH_SPEED_STEP
                prop:value=move || session().speech_speed.to_string()
                on:input=on_speed
            />
            <span class="settings-row__value">{move || format!("{:.2}x", session().speech_speed)}</span>
        </div>
        <div class="settings-row">
            <label for="tags">"Tags"</label>
            <input
                id="tags"
                type="text"
                placeholder="sales, support"
                prop:value=move || format_tags(&session().tags)
                on:change=on_tags
            />
        </div>
    }
}

#[component]
fn InstructionsTab(instructions: RwSignal<String>) -> impl IntoView {
    view! {
        <div class="settings-row settings-row--column">
            <label for="instructions">"Custom instructions"</label>
            <textarea
                id="instructions"
                rows="10"
                prop:value=move || instructions.get()
                on:input=move |ev| instructions.set(event_target_value(&ev))
            ></textarea>
        </div>
    }
}

#[component]
fn GoogleTab(store: RwSignal<SessionStore>) -> impl IntoView {
    let config = expect_context::<ApiConfig>();
    let owner = Owner::current();

    let linked = store.with_untracked(|s| s.session().google_selected_details.clone());
    let selected = RwSignal::new(linked.clone());
    let query = RwSignal::new(String::new());
    let status = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let connected = move || store.with(|s| !s.session().google_access_token.is_empty());

    let visible = move || {
        let needle = query.get();
        filter_details(&linked, &needle).into_iter().cloned().collect::<Vec<_>>()
    };

    let on_save = move |_| {
        if busy.get_untracked() {
            return;
        }
        let token = store.with_untracked(|s| s.session().google_access_token.clone());
        let details = selected.get_untracked();
        patch_store(
            store,
            SessionPatch {
                google_selected_details: Some(details.clone()),
                ..SessionPatch::default()
            },
        );
        busy.set(true);
        let config = config.clone();
        spawn_in(owner.as_ref(), async move {
            let client = session_client(store, config);
            match UserService::new(&client).update_google(&token, &details, true).await {
                Ok(result) => status.set(google_save_message(result.status)),
                Err(e) => status.set(e),
            }
            busy.set(false);
        });
    };

    let on_disconnect = move |_| {
        selected.set(Vec::new());
        patch_store(
            store,
            SessionPatch {
                google_access_token: Some(String::new()),
                google_selected_details: Some(Vec::new()),
                ..SessionPatch::default()
            },
        );
        status.set("Google account disconnected".to_owned());
    };

    view! {
        <div class="settings-row">
            <span>{move || if connected() { "Google account connected" } else { "Google account not connected" }}</span>
        </div>
        <div class="settings-row settings-row--column">
            <label for="sheet-filter">"Linked sheets"</label>
            <input
                id="sheet-filter"
                type="text"
                placeholder="Sheets Name..."
                prop:value=move || query.get()
                on:input=move |ev| query.set(event_target_value(&ev))
            />
            <ul class="google-sheet-list">
                <For
                    each=visible
                    key=|d: &GoogleSelectedDetail| d.id.clone()
                    children=move |detail| {
                        let id = detail.id.clone();
                        let label = format!("{} - {}", detail.sheet_name, detail.title);
                        view! {
                            <li
                                class:google-sheet-selected=move || selected.with(|sel| sel.iter().any(|d| d.id == id))
                                on:click=move |_| {
                                    selected.update(|sel| {
                                        let next = toggle_detail(sel, detail.clone());
                                        *sel = next;
                                    });
                                }
                            >
                                {label}
                            </li>
                        }
                    }
                />
            </ul>
        </div>
        <div class="settings-row">
            <button class="btn btn--danger" disabled=move || !connected() on:click=on_disconnect>"Disconnect"</button>
            <button class="btn" disabled=move || busy.get() || !connected() on:click=on_save>"Save"</button>
        </div>
        <Show when=move || !status.get().is_empty()>
            <p class="settings-status">{move || status.get()}</p>
        </Show>
    }
}

#[component]
fn StorageTab() -> impl IntoView {
    let estimate = RwSignal::new(StorageEstimate::default());
    spawn_scoped(async move { estimate.set(estimate_storage().await) });

    view! {
        <div class="settings-row">
            <span>"Used"</span>
            <span class="settings-row__value">{move || format_bytes_to_mb(estimate.get().usage)}</span>
        </div>
        <div class="settings-row">
            <span>"Quota"</span>
            <span class="settings-row__value">{move || format_bytes_to_mb(estimate.get().quota)}</span>
        </div>
        <div class="settings-row">
            <span>"Usage"</span>
            <span class="settings-row__value">{move || format_percentage(estimate.get().percentage_used())}</span>
        </div>
    }
}
