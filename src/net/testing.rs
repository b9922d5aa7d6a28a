//! Scripted transport shared by the network tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::ApiError;
use crate::net::http::{ApiRequest, ApiResponse, Transport};

/// Replays queued responses in order and records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and a JSON body.
    pub fn respond(self, status: u16, body: serde_json::Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(ApiResponse { status, body: body.to_string() }));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, message: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(ApiError::Transport(message.to_owned())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    /// Requests whose URL ends with `suffix`.
    pub fn count(&self, suffix: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url.ends_with(suffix)).count()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_owned())))
    }
}

/// `{ "data": { "access_token": .., "refresh_token": .. } }`
pub fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::json!({ "data": { "access_token": access, "refresh_token": refresh } })
}
