//! Browser-facing helpers shared by pages, components, and state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `storage` and `dark_mode` wrap `localStorage` and the color-scheme media
//! query behind inert SSR branches; `task` and `auth` carry the reactive
//! plumbing pages need for scoped requests and route protection.

pub mod auth;
pub mod dark_mode;
pub mod storage;
pub mod task;
