//! Shared REST client with bearer auth and a bounded refresh-and-retry stage.
//!
//! DESIGN
//! ======
//! Every request goes through `ApiClient::send`. When the server answers 401
//! and a refresh token is held, the client calls the refresh endpoint once
//! (bounded by `RetryPolicy::max_refresh_retries`) and replays the original
//! request with the new access token. The retry budget is a local counter in
//! `send`, so a replayed request can never trigger a second refresh.
//!
//! Clients are short-lived and built per task. A client with a token source
//! re-reads the shared tokens after a 401 and after a failed refresh: if
//! another task already refreshed them, the request is replayed with the newer
//! access token instead of spending or losing a rotated refresh token.
//!
//! ERROR HANDLING
//! ==============
//! Status codes are not errors at this layer: a 401 that survives the retry
//! stage (refresh failed, no refresh token, or budget spent) is returned as a
//! normal `ApiResponse` so callers see the server's answer unchanged.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::cell::RefCell;
use std::fmt;

use crate::config::ApiConfig;
use crate::error::{ApiError, AuthError};
use crate::net::http::{ApiRequest, ApiResponse, BrowserTransport, Transport};
use crate::net::types::{AuthData, Envelope, RefreshRequest};
use crate::state::session::Session;

const UNAUTHORIZED: u16 = 401;

/// Access/refresh token pair issued by the auth endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl TokenPair {
    pub fn from_session(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }
}

type TokenListener = Box<dyn Fn(&TokenPair)>;
type TokenSource = Box<dyn Fn() -> TokenPair>;

pub struct ApiClient<T: Transport = BrowserTransport> {
    transport: T,
    config: ApiConfig,
    tokens: RefCell<TokenPair>,
    on_tokens_refreshed: Option<TokenListener>,
    token_source: Option<TokenSource>,
}

impl<T: Transport> fmt::Debug for ApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_access_token", &self.tokens.borrow().access_token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient<BrowserTransport> {
    /// Browser client seeded with the session's tokens.
    pub fn for_session(config: ApiConfig, session: &Session) -> Self {
        Self::new(BrowserTransport, config).with_tokens(TokenPair::from_session(session))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self {
            transport,
            config,
            tokens: RefCell::new(TokenPair::default()),
            on_tokens_refreshed: None,
            token_source: None,
        }
    }

    #[must_use]
    pub fn with_tokens(self, tokens: TokenPair) -> Self {
        *self.tokens.borrow_mut() = tokens;
        self
    }

    /// Call `listener` with the new pair after every successful refresh.
    #[must_use]
    pub fn with_token_listener(mut self, listener: impl Fn(&TokenPair) + 'static) -> Self {
        self.on_tokens_refreshed = Some(Box::new(listener));
        self
    }

    /// Read the current shared tokens from `source` before sending and after
    /// every 401.
    #[must_use]
    pub fn with_token_source(mut self, source: impl Fn() -> TokenPair + 'static) -> Self {
        self.token_source = Some(Box::new(source));
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tokens currently held by the client.
    pub fn tokens(&self) -> TokenPair {
        self.tokens.borrow().clone()
    }

    /// Send `request`, refreshing and replaying once on 401.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` only when no response was obtained at all.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.sync_tokens();
        let mut refreshes = 0;
        loop {
            let sent = self.authorize(&request);
            let resp = self.transport.send(&sent).await?;
            if resp.status != UNAUTHORIZED || refreshes >= self.config.retry.max_refresh_retries {
                return Ok(resp);
            }
            self.sync_tokens();
            if sent.session_auth && self.access_token_moved_past(sent.bearer.as_deref()) {
                refreshes += 1;
                leptos::logging::log!("access token changed in flight; replaying {}", request.url);
                continue;
            }
            if self.tokens.borrow().refresh_token.is_none() {
                return Ok(resp);
            }
            refreshes += 1;
            match self.refresh().await {
                Ok(_) => {
                    leptos::logging::log!("access token refreshed; replaying {}", request.url);
                }
                Err(e) => {
                    self.sync_tokens();
                    if sent.session_auth && self.access_token_moved_past(sent.bearer.as_deref()) {
                        leptos::logging::log!("refresh lost to a concurrent refresh; replaying {}", request.url);
                        continue;
                    }
                    leptos::logging::warn!("token refresh failed: {e}");
                    return Ok(resp);
                }
            }
        }
    }

    /// Exchange the held refresh token for a new pair.
    ///
    /// Talks to the transport directly so a 401 here never re-enters the
    /// retry stage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingRefreshToken` without a stored token,
    /// `AuthError::Rejected` on a non-success status, and transport/decode
    /// errors otherwise.
    pub async fn refresh(&self) -> Result<TokenPair, AuthError> {
        let refresh_token = self
            .tokens
            .borrow()
            .refresh_token
            .clone()
            .ok_or(AuthError::MissingRefreshToken)?;
        let request = ApiRequest::post(self.config.refresh_url()).with_json(&RefreshRequest {
            refresh_token: &refresh_token,
        })?;
        let resp = self.transport.send(&request).await?;
        if !resp.is_success() {
            return Err(AuthError::Rejected {
                status: resp.status,
                message: resp.error_message(),
            });
        }
        let envelope: Envelope<AuthData> = resp.json()?;
        let pair = TokenPair {
            access_token: Some(envelope.data.access_token),
            refresh_token: envelope.data.refresh_token.or(Some(refresh_token)),
        };
        *self.tokens.borrow_mut() = pair.clone();
        if let Some(listener) = &self.on_tokens_refreshed {
            listener(&pair);
        }
        Ok(pair)
    }

    fn sync_tokens(&self) {
        if let Some(source) = &self.token_source {
            *self.tokens.borrow_mut() = source();
        }
    }

    /// Whether a different access token is now held than the one `sent` carried.
    fn access_token_moved_past(&self, sent: Option<&str>) -> bool {
        let tokens = self.tokens.borrow();
        tokens.access_token.is_some() && tokens.access_token.as_deref() != sent
    }

    fn authorize(&self, request: &ApiRequest) -> ApiRequest {
        let mut request = request.clone();
        if request.session_auth {
            request.bearer = self.tokens.borrow().access_token.clone();
        }
        request
    }
}
