//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the transport seam, `client` adds bearer auth and the
//! refresh-and-retry stage, `auth` and `user` are the endpoint surfaces, and
//! `types` defines the wire schema.

pub mod auth;
pub mod client;
pub mod http;
pub mod types;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
