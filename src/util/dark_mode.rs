//! OS color-scheme detection and document theme application.
//!
//! Reads the `prefers-color-scheme` media query, listens for its changes, and
//! applies the effective theme as a `data-theme` attribute on `<html>` plus a
//! `dark` class on `<body>`. Requires a browser environment.
//!
//! TRADE-OFFS
//! ==========
//! SSR and test builds safely no-op: the OS signal reads as light and the
//! listener is never attached, keeping server rendering deterministic.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use crate::state::session::Theme;

#[cfg(feature = "hydrate")]
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[cfg(feature = "hydrate")]
fn dark_query() -> Option<web_sys::MediaQueryList> {
    web_sys::window()?.match_media(DARK_QUERY).ok().flatten()
}

/// Whether the OS currently prefers a dark color scheme.
pub fn os_prefers_dark() -> bool {
    #[cfg(feature = "hydrate")]
    {
        dark_query().map_or(false, |mq| mq.matches())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Apply `theme` to the document.
pub fn apply(theme: Theme) {
    #[cfg(feature = "hydrate")]
    {
        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = doc.document_element() {
            let _ = el.set_attribute("data-theme", theme.as_str());
        }
        if let Some(body) = doc.body() {
            let classes = body.class_list();
            let _ = match theme {
                Theme::Dark => classes.add_1("dark"),
                Theme::Light => classes.remove_1("dark"),
            };
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = theme;
    }
}

/// Registration of an OS color-scheme listener; dropping it deregisters.
pub struct OsThemeWatch {
    #[cfg(feature = "hydrate")]
    registration: Option<(
        web_sys::MediaQueryList,
        wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MediaQueryListEvent)>,
    )>,
}

impl OsThemeWatch {
    /// Whether a browser listener is attached.
    pub fn is_active(&self) -> bool {
        #[cfg(feature = "hydrate")]
        {
            self.registration.is_some()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            false
        }
    }
}

/// Call `on_change(is_dark)` whenever the OS color scheme flips.
pub fn watch_os_theme(on_change: impl Fn(bool) + 'static) -> OsThemeWatch {
    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(query) = dark_query() else {
            return OsThemeWatch { registration: None };
        };
        let callback = Closure::<dyn FnMut(web_sys::MediaQueryListEvent)>::wrap(Box::new(
            move |event: web_sys::MediaQueryListEvent| on_change(event.matches()),
        ));
        if query
            .add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
            .is_err()
        {
            leptos::logging::warn!("could not attach color-scheme listener");
            return OsThemeWatch { registration: None };
        }
        OsThemeWatch {
            registration: Some((query, callback)),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = on_change;
        OsThemeWatch {}
    }
}

impl Drop for OsThemeWatch {
    fn drop(&mut self) {
        #[cfg(feature = "hydrate")]
        {
            use wasm_bindgen::JsCast;

            if let Some((query, callback)) = self.registration.take() {
                let _ = query.remove_event_listener_with_callback("change", callback.as_ref().unchecked_ref());
            }
        }
    }
}
