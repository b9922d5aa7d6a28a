use super::*;
use crate::config::ApiConfig;
use crate::net::client::TokenPair;
use crate::net::testing::{ScriptedTransport, token_body};
use crate::state::session::ThemePreference;

fn login_body() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "user": {
                "id": 7,
                "domain": "domain-1",
                "email": "a@b.com",
                "name": "Alice",
                "role": "member",
                "settings": { "userTheme": "dark", "instructions": "Be brief." }
            }
        }
    })
}

fn client(transport: ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::new(transport, ApiConfig::from_base("/api"))
}

// =============================================================
// Validation
// =============================================================

#[test]
fn validate_login_requires_both_fields() {
    assert_eq!(validate_login("  ", "secret1"), Err(ValidationError::MissingLoginFields));
    assert_eq!(validate_login("a@b.com", ""), Err(ValidationError::MissingLoginFields));
    assert_eq!(
        validate_login(" a@b.com ", "secret1"),
        Ok(LoginForm { email: "a@b.com".to_owned(), password: "secret1".to_owned() })
    );
}

#[test]
fn validate_register_rejects_missing_fields() {
    assert_eq!(
        validate_register("", "a@b.com", "abcdef", "abcdef"),
        Err(ValidationError::MissingRegisterFields)
    );
    assert_eq!(
        validate_register("domain-1", "a@b.com", "abcdef", ""),
        Err(ValidationError::MissingRegisterFields)
    );
}

#[test]
fn validate_register_rejects_short_password() {
    assert_eq!(
        validate_register("domain-1", "a@b.com", "abc", "abc"),
        Err(ValidationError::PasswordTooShort)
    );
}

#[test]
fn validate_register_rejects_mismatch() {
    assert_eq!(
        validate_register("domain-1", "a@b.com", "abcdef", "abcdeg"),
        Err(ValidationError::PasswordMismatch)
    );
}

#[test]
fn validate_register_accepts_valid_form() {
    let form = validate_register(" domain-1 ", "a@b.com", "abcdef", "abcdef").unwrap();
    assert_eq!(form.domain, "domain-1");
}

#[test]
fn password_hints_follow_typing() {
    assert!(password_hints("", "").is_empty());
    assert_eq!(password_hints("abc", ""), vec![ValidationError::PasswordTooShort]);
    assert_eq!(
        password_hints("abc", "abd"),
        vec![ValidationError::PasswordTooShort, ValidationError::PasswordMismatch]
    );
    assert_eq!(password_hints("abcdef", "abcdeg"), vec![ValidationError::PasswordMismatch]);
    assert!(password_hints("abcdef", "abcdef").is_empty());
}

// =============================================================
// Login
// =============================================================

#[tokio::test]
async fn login_success_maps_full_session() {
    let client = client(ScriptedTransport::new().respond(200, login_body()));
    let form = validate_login("a@b.com", "secret1").unwrap();

    let session = AuthGateway::new(&client).login(&form).await.unwrap();

    assert_eq!(session.access_token.as_deref(), Some("at-1"));
    assert_eq!(session.refresh_token.as_deref(), Some("rt-1"));
    assert_eq!(session.user_id, "7");
    assert_eq!(session.role, "member");
    assert_eq!(session.theme_preference, ThemePreference::Dark);
    assert_eq!(session.instructions, "Be brief.");
    assert_eq!(session.speech_voice, "echo");

    let sent = &client.transport().requests()[0];
    assert!(sent.url.ends_with("/v1/auth/login"));
    assert_eq!(sent.body, Some(serde_json::json!({ "email": "a@b.com", "password": "secret1" })));
}

#[tokio::test]
async fn login_tolerates_unknown_user_theme() {
    for theme in [serde_json::json!(""), serde_json::json!("sepia"), serde_json::json!(3)] {
        let mut body = login_body();
        body["data"]["user"]["settings"]["userTheme"] = theme;
        let client = client(ScriptedTransport::new().respond(200, body));
        let form = validate_login("a@b.com", "secret1").unwrap();

        let session = AuthGateway::new(&client).login(&form).await.unwrap();

        assert_eq!(session.access_token.as_deref(), Some("at-1"));
        assert_eq!(session.theme_preference, ThemePreference::System);
        assert_eq!(session.instructions, "Be brief.");
    }
}

#[tokio::test]
async fn login_rejection_carries_server_message() {
    let client = client(ScriptedTransport::new().respond(401, serde_json::json!({ "message": "Invalid credentials" })));
    let form = validate_login("a@b.com", "wrong").unwrap();

    let err = AuthGateway::new(&client).login(&form).await.unwrap_err();

    assert_eq!(err, AuthError::Rejected { status: 401, message: "Invalid credentials".to_owned() });
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn login_transport_failure_is_transport_error() {
    let client = client(ScriptedTransport::new().fail("offline"));
    let form = validate_login("a@b.com", "secret1").unwrap();
    let err = AuthGateway::new(&client).login(&form).await.unwrap_err();
    assert_eq!(err, AuthError::Transport("offline".to_owned()));
}

#[tokio::test]
async fn login_without_user_is_decode_error() {
    let client = client(ScriptedTransport::new().respond(200, token_body("at", "rt")));
    let form = validate_login("a@b.com", "secret1").unwrap();
    let err = AuthGateway::new(&client).login(&form).await.unwrap_err();
    assert!(matches!(err, AuthError::Decode(_)));
}

// =============================================================
// Register / refresh / status
// =============================================================

#[tokio::test]
async fn register_posts_re_password() {
    let client = client(ScriptedTransport::new().respond(200, login_body()));
    let form = validate_register("domain-1", "a@b.com", "abcdef", "abcdef").unwrap();

    let session = AuthGateway::new(&client).register(&form).await.unwrap();

    assert_eq!(session.domain, "domain-1");
    let sent = &client.transport().requests()[0];
    assert!(sent.url.ends_with("/v1/auth/register"));
    assert_eq!(sent.body.as_ref().unwrap()["re_password"], "abcdef");
}

#[tokio::test]
async fn register_rejection_carries_server_message() {
    let client = client(ScriptedTransport::new().respond(409, serde_json::json!({ "message": "Email already registered" })));
    let form = validate_register("domain-1", "a@b.com", "abcdef", "abcdef").unwrap();
    let err = AuthGateway::new(&client).register(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");
}

#[tokio::test]
async fn refresh_yields_token_only_patch() {
    let client = client(ScriptedTransport::new().respond(200, token_body("at-2", "rt-2")))
        .with_tokens(TokenPair { access_token: Some("at-1".to_owned()), refresh_token: Some("rt-1".to_owned()) });

    let patch = AuthGateway::new(&client).refresh().await.unwrap();

    assert_eq!(patch, SessionPatch::tokens("at-2".to_owned(), Some("rt-2".to_owned())));
}

#[tokio::test]
async fn check_status_reports_success() {
    let client = client(ScriptedTransport::new().respond(200, serde_json::json!({})));
    assert!(AuthGateway::new(&client).check_status().await);

    let client = client_failing();
    assert!(!AuthGateway::new(&client).check_status().await);
}

fn client_failing() -> ApiClient<ScriptedTransport> {
    client(ScriptedTransport::new().fail("offline"))
}
