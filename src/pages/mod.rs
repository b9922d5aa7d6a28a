//! Route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages read the session store and `ApiConfig` from context, validate input
//! before any request, and hand results back to the store. The settings modal
//! lives in `components`.

pub mod home;
pub mod login;
pub mod register;
