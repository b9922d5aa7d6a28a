//! Endpoint and policy configuration for the REST client.
//!
//! DESIGN
//! ======
//! WASM builds have no process environment at runtime, so the API base URL is
//! captured at compile time from `CHATDESK_API_BASE` and falls back to the
//! same-origin `/api` prefix.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

/// Compile-time override for the API base URL.
const API_BASE_ENV: Option<&str> = option_env!("CHATDESK_API_BASE");

/// Same-origin default used when no override is compiled in.
pub const DEFAULT_API_BASE: &str = "/api";

/// How often the credential watch checks for an externally cleared token.
pub const CREDENTIAL_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Bounded refresh-and-replay policy applied to 401 responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of refresh attempts per original request.
    pub max_refresh_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_refresh_retries: 1 }
    }
}

/// Resolved endpoint prefixes for every backend surface the client talks to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Prefix for `/login`, `/register`, `/refresh`, `/status`.
    pub auth_endpoint: String,
    /// Prefix for `/settings` and `/google`.
    pub user_endpoint: String,
    /// Full URL of the domain list used by the registration form.
    pub domains_endpoint: String,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    /// Build endpoint prefixes under `base`, trimming any trailing slash.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_endpoint: format!("{base}/v1/auth"),
            user_endpoint: format!("{base}/v1/user"),
            domains_endpoint: format!("{base}/v1/domains"),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.auth_endpoint)
    }

    pub fn register_url(&self) -> String {
        format!("{}/register", self.auth_endpoint)
    }

    pub fn refresh_url(&self) -> String {
        format!("{}/refresh", self.auth_endpoint)
    }

    pub fn status_url(&self) -> String {
        format!("{}/status", self.auth_endpoint)
    }

    pub fn settings_url(&self) -> String {
        format!("{}/settings", self.user_endpoint)
    }

    pub fn google_url(&self) -> String {
        format!("{}/google", self.user_endpoint)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_base(API_BASE_ENV.unwrap_or(DEFAULT_API_BASE))
    }
}
