use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::RetryPolicy;
use crate::net::testing::{ScriptedTransport, token_body};

fn config() -> ApiConfig {
    ApiConfig::from_base("/api")
}

fn signed_in(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::new(transport, config()).with_tokens(TokenPair {
        access_token: Some("at-old".to_owned()),
        refresh_token: Some("rt-old".to_owned()),
    })
}

fn settings_request() -> ApiRequest {
    ApiRequest::put("/api/v1/user/settings").with_session_auth()
}

// =============================================================
// Pass-through
// =============================================================

#[tokio::test]
async fn success_passes_through_without_refresh() {
    let client = signed_in(ScriptedTransport::new().respond(200, serde_json::json!({ "data": {} })));
    let resp = client.send(settings_request()).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(client.transport().count("/refresh"), 0);
}

#[tokio::test]
async fn session_auth_attaches_current_access_token() {
    let client = signed_in(ScriptedTransport::new().respond(200, serde_json::json!({})));
    client.send(settings_request()).await.unwrap();
    assert_eq!(client.transport().requests()[0].bearer.as_deref(), Some("at-old"));
}

#[tokio::test]
async fn unauthenticated_request_carries_no_bearer() {
    let client = signed_in(ScriptedTransport::new().respond(200, serde_json::json!({})));
    client.send(ApiRequest::get("/api/v1/domains")).await.unwrap();
    assert_eq!(client.transport().requests()[0].bearer, None);
}

#[tokio::test]
async fn non_401_errors_are_not_retried() {
    let client = signed_in(ScriptedTransport::new().respond(500, serde_json::json!({})));
    let resp = client.send(settings_request()).await.unwrap();
    assert_eq!(resp.status, 500);
    assert_eq!(client.transport().requests().len(), 1);
}

// =============================================================
// Refresh and replay
// =============================================================

#[tokio::test]
async fn unauthorized_triggers_one_refresh_and_one_replay() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({ "message": "expired" }))
        .respond(200, token_body("at-new", "rt-new"))
        .respond(200, serde_json::json!({ "data": "ok" }));
    let client = signed_in(transport);

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(client.transport().count("/refresh"), 1);
    assert_eq!(client.transport().count("/settings"), 2);
    let requests = client.transport().requests();
    assert_eq!(requests[1].body, Some(serde_json::json!({ "refresh_token": "rt-old" })));
    assert_eq!(requests[2].bearer.as_deref(), Some("at-new"));
    assert_eq!(client.tokens().refresh_token.as_deref(), Some("rt-new"));
}

#[tokio::test]
async fn second_401_after_replay_does_not_refresh_again() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({}))
        .respond(200, token_body("at-new", "rt-new"))
        .respond(401, serde_json::json!({ "message": "still no" }));
    let client = signed_in(transport);

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 401);
    assert_eq!(resp.error_message(), "still no");
    assert_eq!(client.transport().count("/refresh"), 1);
    assert_eq!(client.transport().requests().len(), 3);
}

#[tokio::test]
async fn failed_refresh_surfaces_original_401() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({ "message": "expired" }))
        .respond(401, serde_json::json!({ "message": "refresh revoked" }));
    let client = signed_in(transport);

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 401);
    assert_eq!(resp.error_message(), "expired");
    assert_eq!(client.transport().requests().len(), 2);
    assert_eq!(client.tokens().access_token.as_deref(), Some("at-old"));
}

#[tokio::test]
async fn no_refresh_token_means_no_retry() {
    let transport = ScriptedTransport::new().respond(401, serde_json::json!({}));
    let client = ApiClient::new(transport, config());
    let resp = client.send(settings_request()).await.unwrap();
    assert_eq!(resp.status, 401);
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn zero_retry_budget_disables_refresh() {
    let transport = ScriptedTransport::new().respond(401, serde_json::json!({}));
    let client = ApiClient::new(transport, config().with_retry(RetryPolicy { max_refresh_retries: 0 }))
        .with_tokens(TokenPair { access_token: Some("a".to_owned()), refresh_token: Some("r".to_owned()) });
    let resp = client.send(settings_request()).await.unwrap();
    assert_eq!(resp.status, 401);
    assert_eq!(client.transport().count("/refresh"), 0);
}

#[tokio::test]
async fn refresh_notifies_listener() {
    let seen = Rc::new(RefCell::new(None));
    let seen_listener = seen.clone();
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({}))
        .respond(200, token_body("at-new", "rt-new"))
        .respond(200, serde_json::json!({}));
    let client = signed_in(transport).with_token_listener(move |pair| {
        *seen_listener.borrow_mut() = Some(pair.clone());
    });

    client.send(settings_request()).await.unwrap();

    let pair = seen.borrow().clone().unwrap();
    assert_eq!(pair.access_token.as_deref(), Some("at-new"));
}

#[tokio::test]
async fn refresh_keeps_old_refresh_token_when_not_rotated() {
    let transport =
        ScriptedTransport::new().respond(200, serde_json::json!({ "data": { "access_token": "at-new" } }));
    let client = signed_in(transport);
    let pair = client.refresh().await.unwrap();
    assert_eq!(pair.refresh_token.as_deref(), Some("rt-old"));
}

#[tokio::test]
async fn refresh_without_token_is_rejected_locally() {
    let client = ApiClient::new(ScriptedTransport::new(), config());
    assert_eq!(client.refresh().await.unwrap_err(), AuthError::MissingRefreshToken);
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn transport_failure_propagates() {
    let client = signed_in(ScriptedTransport::new().fail("offline"));
    let err = client.send(settings_request()).await.unwrap_err();
    assert_eq!(err, ApiError::Transport("offline".to_owned()));
}

// =============================================================
// Shared token source
// =============================================================

fn pair(access: &str, refresh: &str) -> TokenPair {
    TokenPair { access_token: Some(access.to_owned()), refresh_token: Some(refresh.to_owned()) }
}

/// Source that yields `first` on its first read and `later` afterwards.
fn changing_source(first: TokenPair, later: TokenPair) -> impl Fn() -> TokenPair {
    let reads = std::cell::Cell::new(0);
    move || {
        reads.set(reads.get() + 1);
        if reads.get() == 1 { first.clone() } else { later.clone() }
    }
}

#[tokio::test]
async fn token_refreshed_elsewhere_is_reused_without_refreshing() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({}))
        .respond(200, serde_json::json!({}));
    let client = ApiClient::new(transport, config())
        .with_token_source(changing_source(pair("at-old", "rt-old"), pair("at-new", "rt-new")));

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(client.transport().count("/refresh"), 0);
    let requests = client.transport().requests();
    assert_eq!(requests[0].bearer.as_deref(), Some("at-old"));
    assert_eq!(requests[1].bearer.as_deref(), Some("at-new"));
}

#[tokio::test]
async fn refresh_spends_latest_refresh_token_from_source() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({}))
        .respond(200, token_body("at-2", "rt-2"))
        .respond(200, serde_json::json!({}));
    let client = signed_in(transport).with_token_source(|| pair("at-old", "rt-latest"));

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 200);
    let requests = client.transport().requests();
    assert_eq!(requests[1].body, Some(serde_json::json!({ "refresh_token": "rt-latest" })));
    assert_eq!(requests[2].bearer.as_deref(), Some("at-2"));
}

#[tokio::test]
async fn refresh_lost_to_concurrent_rotation_replays_with_winner_token() {
    let reads = std::cell::Cell::new(0);
    let source = move || {
        reads.set(reads.get() + 1);
        // Initial read and post-401 read see the old pair; the winner lands
        // before the failed refresh is inspected.
        if reads.get() <= 2 { pair("at-old", "rt-old") } else { pair("at-win", "rt-win") }
    };
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({}))
        .respond(401, serde_json::json!({ "message": "refresh token already used" }))
        .respond(200, serde_json::json!({}));
    let client = ApiClient::new(transport, config()).with_token_source(source);

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(client.transport().count("/refresh"), 1);
    assert_eq!(client.transport().requests()[2].bearer.as_deref(), Some("at-win"));
}

#[tokio::test]
async fn unchanged_source_still_surfaces_failed_refresh() {
    let transport = ScriptedTransport::new()
        .respond(401, serde_json::json!({ "message": "expired" }))
        .respond(401, serde_json::json!({ "message": "revoked" }));
    let client = ApiClient::new(transport, config()).with_token_source(|| pair("at-old", "rt-old"));

    let resp = client.send(settings_request()).await.unwrap();

    assert_eq!(resp.status, 401);
    assert_eq!(resp.error_message(), "expired");
    assert_eq!(client.transport().requests().len(), 2);
}
