mod common;

use common::client;
use console_framework::mock::MockTransport;
use console_framework::{
    ApiRequest, AuthError, ConsoleConfig, Credentials, GatewayError, Method, Navigator,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn concurrent_401s_redirect_exactly_once() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/users?page=1&limit=10")
        .with_delay(Duration::from_millis(20))
        .return_json(401, json!({"message": "Unauthorized"}));
    mock.expect(Method::Get, "/clans?page=1&limit=10")
        .return_json(401, json!({"message": "Unauthorized"}));

    let (client, navigator) = client(Arc::new(mock.clone()), &ConsoleConfig::default(), "/users");

    let (a, b) = tokio::join!(
        client.request(ApiRequest::get("/users?page=1&limit=10")),
        client.request(ApiRequest::get("/clans?page=1&limit=10")),
    );

    assert!(a.unwrap_err().is_unauthenticated());
    assert_eq!(b.unwrap_err(), GatewayError::Unauthenticated);
    assert_eq!(navigator.history(), vec!["/login".to_string()]);
    assert!(!client.session().is_authenticated());
    mock.verify();
}

#[tokio::test]
async fn no_redirect_when_already_on_login_view() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/settings/1").return_status(401);

    let config = ConsoleConfig {
        base_path: "/admin".into(),
        ..Default::default()
    };
    let (client, navigator) = client(Arc::new(mock), &config, "/admin/login?next=%2Fsettings");

    let result = client.request(ApiRequest::get("/settings/1")).await;
    assert_eq!(result.unwrap_err(), GatewayError::Unauthenticated);
    assert!(navigator.history().is_empty());
    assert!(!client.session().redirect_pending());
}

#[tokio::test]
async fn a_view_merely_ending_in_login_still_redirects() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/users/3").return_status(401);

    let (client, navigator) = client(Arc::new(mock), &ConsoleConfig::default(), "/users/login");

    let result = client.request(ApiRequest::get("/users/3")).await;
    assert_eq!(result.unwrap_err(), GatewayError::Unauthenticated);
    assert_eq!(navigator.history(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn redirect_target_includes_base_path() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/wars/2").return_status(401);

    let config = ConsoleConfig {
        base_path: "/ops/console".into(),
        ..Default::default()
    };
    let (client, navigator) = client(Arc::new(mock), &config, "/ops/console/wars");

    let _ = client.request(ApiRequest::get("/wars/2")).await;
    assert_eq!(navigator.current_path(), "/ops/console/login");
}

#[tokio::test]
async fn only_a_fresh_login_rearms_the_redirect() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/kits/1").return_status(401);
    mock.expect(Method::Get, "/kits/2").return_status(401);
    mock.expect(Method::Post, "/auth/admin/login")
        .return_json(201, json!({"id": 1, "username": "root"}));
    mock.expect(Method::Get, "/kits/3").return_status(401);

    let (client, navigator) = client(Arc::new(mock.clone()), &ConsoleConfig::default(), "/kits");

    let _ = client.request(ApiRequest::get("/kits/1")).await;
    // The user navigates away from login without signing in: still no second redirect.
    navigator.navigate("/kits");
    let _ = client.request(ApiRequest::get("/kits/2")).await;
    assert_eq!(navigator.history().len(), 2);

    client
        .login(&Credentials::new("root", "secret"))
        .await
        .unwrap();
    assert!(client.session().is_authenticated());
    navigator.navigate("/kits");

    let _ = client.request(ApiRequest::get("/kits/3")).await;
    assert_eq!(
        navigator.history(),
        vec!["/login", "/kits", "/kits", "/login"]
    );
    mock.verify();
}

#[tokio::test]
async fn classifies_http_and_network_failures() {
    let mock = MockTransport::new();
    mock.expect(Method::Post, "/clans")
        .return_json(409, json!({"message": "Clan tag already taken"}));
    mock.expect(Method::Get, "/clans/1")
        .return_err(GatewayError::Network("connection refused".into()));

    let (client, navigator) = client(Arc::new(mock), &ConsoleConfig::default(), "/clans");

    let conflict = client
        .request(ApiRequest::new(Method::Post, "/clans").with_json(json!({"tag": "RX"})))
        .await;
    assert_eq!(
        conflict.unwrap_err(),
        GatewayError::Http {
            status: 409,
            message: "Clan tag already taken".into()
        }
    );

    let offline = client.request(ApiRequest::get("/clans/1")).await;
    assert!(matches!(offline, Err(GatewayError::Network(_))));
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn probe_sets_flag_without_redirecting() {
    let mock = MockTransport::new();
    mock.expect(Method::Get, "/admins/me").return_status(401);
    mock.expect(Method::Get, "/admins/me")
        .return_json(200, json!({"id": 1, "username": "root"}));

    let (client, navigator) = client(Arc::new(mock), &ConsoleConfig::default(), "/users");

    assert!(!client.probe_session().await);
    assert!(navigator.history().is_empty());
    assert!(client.probe_session().await);
    assert!(client.session().is_authenticated());
}

#[tokio::test]
async fn rejected_login_reports_server_message() {
    let mock = MockTransport::new();
    mock.expect(Method::Post, "/auth/admin/login")
        .return_json(401, json!({"message": "Invalid credentials"}));

    let (client, navigator) = client(Arc::new(mock), &ConsoleConfig::default(), "/login");

    let err = client
        .login(&Credentials::new("root", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::Rejected("Invalid credentials".into()));
    assert!(!client.session().is_authenticated());
    assert!(navigator.history().is_empty());
}

#[tokio::test]
async fn logout_clears_session_even_when_request_fails() {
    let mock = MockTransport::new();
    mock.expect(Method::Post, "/auth/admin/login").return_status(201);
    mock.expect(Method::Post, "/auth/admin/logout")
        .return_err(GatewayError::Network("timeout".into()));

    let (client, navigator) = client(Arc::new(mock), &ConsoleConfig::default(), "/users");
    client
        .login(&Credentials::new("root", "secret"))
        .await
        .unwrap();

    client.logout().await;
    assert!(!client.session().is_authenticated());
    assert_eq!(navigator.current_path(), "/login");
}
