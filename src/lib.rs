//! # chatdesk
//!
//! Leptos + WASM frontend for the chat application's account surface:
//! login and registration, the user-settings modal, route protection, and
//! the session store that mirrors user preferences into `localStorage`.
//!
//! This crate contains pages, components, application state, the REST client
//! with its refresh-and-retry stage, and browser utility helpers.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point: installs panic/log hooks and hydrates the SSR shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
