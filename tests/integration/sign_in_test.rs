//! Sign-in and refresh tests
//!
//! Exercise `AuthenticationService::sign_in` and `refresh_current_user`
//! over HTTP against the wiremock backend.

use assert_matches::assert_matches;
use datawizard::services::database::{LOGIN_RPC_PATH, USERS_PATH};
use datawizard::shared::{AuthError, AuthStateChanged, ErrorCategory, UserData};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{login_failure_body, login_success_body, TestBackend, TestUser};

#[tokio::test]
async fn test_sign_in_success_establishes_session() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;
    backend.mock_last_login(user.id, 204).await;

    let mut auth = backend.auth_service();
    let mut rx = auth.subscribe();

    let change = assert_ok!(auth.sign_in("alice", "secret1").await);

    let expected = UserData {
        id: user.id,
        username: "alice".to_string(),
        email: "alice@gmail.com".to_string(),
        full_name: Some("Alice A".to_string()),
    };
    assert_eq!(change, AuthStateChanged::signed_in(expected.clone()));
    assert_eq!(rx.try_recv().unwrap(), change);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user(), Some(&expected));
    assert_eq!(auth.current_username(), Some("alice"));
}

#[tokio::test]
async fn test_sign_in_sends_credentials_payload() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);

    let requests = backend.requests_to("POST", LOGIN_RPC_PATH).await;
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body, json!({ "p_username": "alice", "p_password": "secret1" }));
}

#[tokio::test]
async fn test_sign_in_stamps_last_login_in_background() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;
    backend.mock_last_login(user.id, 204).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);

    let patch = backend
        .wait_for_request("PATCH", USERS_PATH)
        .await
        .expect("last_login_at update was sent");
    assert_eq!(patch.url.query(), Some(format!("id=eq.{}", user.id).as_str()));
    let body: serde_json::Value = patch.body_json().unwrap();
    let stamp = body["last_login_at"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
}

#[tokio::test]
async fn test_last_login_failure_does_not_affect_sign_in() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;
    backend.mock_last_login(user.id, 500).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn test_sign_in_blank_input_makes_no_request() {
    let backend = TestBackend::start().await;
    backend.expect_no_requests().await;

    let mut auth = backend.auth_service();
    for (username, password) in [("", "secret1"), ("   ", "secret1"), ("alice", ""), ("alice", "\t ")] {
        let err = assert_err!(auth.sign_in(username, password).await);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_sign_in_nonzero_status_leaves_session_alone() {
    let backend = TestBackend::start().await;
    backend.mock_login(200, login_failure_body(1), 1).await;

    let mut auth = backend.auth_service();
    let mut rx = auth.subscribe();

    let err = assert_err!(auth.sign_in("alice", "wrong").await);
    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(err.to_string(), "Invalid username or password");
    assert!(!auth.is_authenticated());
    assert!(rx.try_recv().is_err(), "no state change on failure");
}

#[tokio::test]
async fn test_sign_in_failure_keeps_existing_session() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);

    backend.server.reset().await;
    backend.mock_login(200, login_failure_body(2), 1).await;

    assert_err!(auth.sign_in("bob", "nope").await);
    assert_eq!(auth.current_user_id(), Some(user.id));
}

#[tokio::test]
async fn test_sign_in_status_zero_without_id_is_rejected() {
    let backend = TestBackend::start().await;
    backend
        .mock_login(200, json!([{ "Id": null, "Username": "alice", "LoginStatus": 0 }]), 1)
        .await;

    let mut auth = backend.auth_service();
    assert_eq!(
        assert_err!(auth.sign_in("alice", "secret1").await),
        AuthError::InvalidCredentials
    );
}

#[tokio::test]
async fn test_sign_in_empty_result_list_is_rejected() {
    let backend = TestBackend::start().await;
    backend.mock_login(200, json!([]), 1).await;

    let mut auth = backend.auth_service();
    assert_eq!(
        assert_err!(auth.sign_in("alice", "secret1").await),
        AuthError::InvalidCredentials
    );
}

#[tokio::test]
async fn test_sign_in_http_error_carries_body() {
    let backend = TestBackend::start().await;
    backend
        .mock_login(400, json!({ "message": "function fn_user_login does not exist" }), 1)
        .await;

    let mut auth = backend.auth_service();
    let err = assert_err!(auth.sign_in("alice", "secret1").await);
    assert_eq!(err.category(), ErrorCategory::Rejected);
    assert_contains!(err.to_string(), "Login failed:");
    assert_contains!(err.to_string(), "fn_user_login does not exist");
}

#[tokio::test]
async fn test_sign_in_undecodable_body_is_an_error_value() {
    let backend = TestBackend::start().await;
    backend.mock_login(200, json!({ "unexpected": true }), 1).await;

    let mut auth = backend.auth_service();
    let err = assert_err!(auth.sign_in("alice", "secret1").await);
    assert_matches!(err, AuthError::Decode(_));
    assert!(!auth.is_authenticated());
}

/// Login row for `id` with status `status`, keys spelled per `casing`
fn login_row_in_casing(casing: &str, id: uuid::Uuid, status: i32) -> serde_json::Value {
    match casing {
        "pascal" => json!({ "Id": id, "Username": "alice", "LoginStatus": status }),
        "snake" => json!({ "id": id, "username": "alice", "login_status": status }),
        "lower" => json!({ "id": id, "username": "alice", "loginstatus": status }),
        "upper" => json!({ "ID": id, "USERNAME": "alice", "LOGINSTATUS": status }),
        other => panic!("unknown casing {}", other),
    }
}

#[tokio::test]
async fn test_sign_in_nonzero_status_rejected_in_every_casing() {
    for casing in ["pascal", "snake", "lower", "upper"] {
        let backend = TestBackend::start().await;
        let user = TestUser::alice();
        backend
            .mock_login(200, json!([login_row_in_casing(casing, user.id, 1)]), 1)
            .await;

        let mut auth = backend.auth_service();
        let mut rx = auth.subscribe();

        let err = assert_err!(auth.sign_in("alice", "wrong").await);
        assert_eq!(err, AuthError::InvalidCredentials, "casing {}", casing);
        assert!(!auth.is_authenticated(), "casing {}", casing);
        assert!(rx.try_recv().is_err(), "casing {}", casing);
        assert!(backend.requests_to("PATCH", USERS_PATH).await.is_empty());
    }
}

#[tokio::test]
async fn test_sign_in_success_in_every_casing() {
    for casing in ["pascal", "snake", "lower", "upper"] {
        let backend = TestBackend::start().await;
        let user = TestUser::alice();
        backend
            .mock_login(200, json!([login_row_in_casing(casing, user.id, 0)]), 1)
            .await;
        backend.mock_last_login(user.id, 204).await;

        let mut auth = backend.auth_service();
        assert_ok!(auth.sign_in("alice", "secret1").await);
        assert_eq!(auth.current_user_id(), Some(user.id), "casing {}", casing);
        assert_eq!(auth.current_username(), Some("alice"), "casing {}", casing);
    }
}

#[tokio::test]
async fn test_sign_in_snake_case_rows_are_accepted() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend
        .mock_login(
            200,
            json!([{
                "id": user.id,
                "username": "alice",
                "email": "alice@gmail.com",
                "full_name": null,
                "login_status": 0
            }]),
            1,
        )
        .await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);
    assert_eq!(auth.current_user_full_name(), None);
    assert_eq!(auth.current_user_email(), Some("alice@gmail.com"));
}

#[tokio::test]
async fn test_refresh_updates_record_with_empty_password() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);

    backend.server.reset().await;
    let mut renamed = user.login_row();
    renamed["FullName"] = json!("Alice Anders");
    backend.mock_login(200, json!([renamed]), 1).await;

    let mut rx = auth.subscribe();
    assert!(auth.refresh_current_user().await);
    assert_eq!(auth.current_user_full_name(), Some("Alice Anders"));
    assert!(rx.try_recv().unwrap().is_authenticated);

    let requests = backend.requests_to("POST", LOGIN_RPC_PATH).await;
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body, json!({ "p_username": "alice", "p_password": "" }));
}

#[tokio::test]
async fn test_refresh_failure_stays_signed_in() {
    let backend = TestBackend::start().await;
    let user = TestUser::alice();
    backend.mock_login(200, login_success_body(&user), 1).await;

    let mut auth = backend.auth_service();
    assert_ok!(auth.sign_in("alice", "secret1").await);

    backend.server.reset().await;
    backend.mock_login(200, login_failure_body(1), 1).await;

    assert!(!auth.refresh_current_user().await);
    assert!(auth.is_authenticated());
    assert_eq!(auth.current_user_id(), Some(user.id));
}

#[tokio::test]
async fn test_refresh_when_signed_out_makes_no_request() {
    let backend = TestBackend::start().await;
    backend.expect_no_requests().await;

    let mut auth = backend.auth_service();
    assert!(!auth.refresh_current_user().await);
}
