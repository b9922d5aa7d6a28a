use super::*;

#[test]
fn rejected_login_shows_server_message() {
    let err = AuthError::Rejected { status: 401, message: "Invalid credentials".to_owned() };
    assert_eq!(auth_failure_message(&err), "Invalid credentials");
}

#[test]
fn transport_failure_shows_generic_message() {
    let err = AuthError::Transport("connection refused".to_owned());
    assert_eq!(auth_failure_message(&err), UNREACHABLE_MESSAGE);
}

#[test]
fn decode_failure_keeps_its_description() {
    let err = AuthError::Decode("response is missing user".to_owned());
    assert_eq!(auth_failure_message(&err), "unexpected response: response is missing user");
}
