//! Reusable UI components shared across pages.

pub mod user_settings_modal;
