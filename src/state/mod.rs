//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the value type, `session_store` owns it, `persistence` maps it
//! to storage keys, and `settings` holds modal-local helpers. Components depend
//! on the store through a single `RwSignal<SessionStore>` context.

pub mod credential_watch;
pub mod persistence;
pub mod session;
pub mod session_store;
pub mod settings;
