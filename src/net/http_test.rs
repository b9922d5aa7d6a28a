use super::*;

#[test]
fn request_builders_set_method_and_url() {
    assert_eq!(ApiRequest::get("/a").method, Method::Get);
    assert_eq!(ApiRequest::post("/b").method, Method::Post);
    let put = ApiRequest::put("/c");
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.url, "/c");
    assert!(put.body.is_none());
    assert!(put.bearer.is_none());
}

#[test]
fn with_json_and_session_auth_attach_parts() {
    let req = ApiRequest::put("/settings")
        .with_json(&serde_json::json!({ "instructions": "Be brief." }))
        .unwrap()
        .with_session_auth();
    assert_eq!(req.body, Some(serde_json::json!({ "instructions": "Be brief." })));
    assert!(req.session_auth);
    assert!(req.bearer.is_none());
}

#[test]
fn success_range_is_2xx() {
    let ok = ApiResponse { status: 204, body: String::new() };
    let unauthorized = ApiResponse { status: 401, body: String::new() };
    assert!(ok.is_success());
    assert!(!unauthorized.is_success());
}

#[test]
fn error_message_prefers_server_message() {
    let resp = ApiResponse { status: 400, body: r#"{"message":"Email already taken"}"#.to_owned() };
    assert_eq!(resp.error_message(), "Email already taken");
}

#[test]
fn error_message_falls_back_to_status_line() {
    let resp = ApiResponse { status: 502, body: "<html>bad gateway</html>".to_owned() };
    assert_eq!(resp.error_message(), "request failed with status 502");
    let resp = ApiResponse { status: 400, body: r#"{"message":""}"#.to_owned() };
    assert_eq!(resp.error_message(), "request failed with status 400");
}

#[test]
fn json_decode_failure_is_decode_error() {
    let resp = ApiResponse { status: 200, body: "not json".to_owned() };
    let err = resp.json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn browser_transport_fails_outside_browser() {
    let err = BrowserTransport.send(&ApiRequest::get("/x")).await.unwrap_err();
    assert_eq!(err, ApiError::Transport("not available on server".to_owned()));
}
