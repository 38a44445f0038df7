//! Admin provider tests against a mock Keycloak server.

use kc_admin_client::{
    AdminError, AdminProvider, ProviderConfig, RemoteError, UserAttribute, UserDirectory,
    UserRecord,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REALM: &str = "acme";
const TOKEN: &str = "test-access-token";
const TOKEN_PATH: &str = "/realms/acme/protocol/openid-connect/token";
const USERS_PATH: &str = "/admin/realms/acme/users";

fn provider(server: &MockServer) -> AdminProvider {
    let config = ProviderConfig::new(server.uri(), REALM, "admin-cli", "s3cret")
        .with_username("service-account");
    AdminProvider::new(config).expect("valid config")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": 300,
        })))
        .mount(server)
        .await;
}

async fn mount_lookup(server: &MockServer, username: &str, users: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("username", username))
        .and(query_param("exact", "true"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(users))
        .mount(server)
        .await;
}

fn user_payload() -> UserRecord {
    UserRecord::default()
        .with_email("a@x.com")
        .with_first_name("Ada")
        .with_enabled(true)
        .with_attribute("dept", "eng")
}

/// Tests that the token request is form-encoded with the service-account fields.
#[tokio::test]
async fn test_token_request_sends_service_account_form() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=service-account"))
        .and(body_string_contains("client_id=admin-cli"))
        .and(body_string_contains("client_secret=s3cret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": TOKEN})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/u1")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let view = provider(&server).get_user("u1").await?;
    assert_eq!(view.username, "u1");

    Ok(())
}

/// Tests that a rejected token request surfaces as a token acquisition error.
#[tokio::test]
async fn test_token_rejection_is_token_acquisition_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Invalid client or Invalid client credentials",
        })))
        .mount(&server)
        .await;

    let err = provider(&server).get_user("u1").await.unwrap_err();

    assert!(matches!(err, AdminError::TokenAcquisition { .. }));
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Invalid client credentials"));

    Ok(())
}

/// Tests that a token response without `access_token` is rejected.
#[tokio::test]
async fn test_token_without_access_token_is_rejected() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&server)
        .await;

    let err = provider(&server).list_users(None).await.unwrap_err();

    assert!(matches!(
        err,
        AdminError::TokenAcquisition {
            source: RemoteError::MissingField("access_token")
        }
    ));

    Ok(())
}

/// Tests that an empty token fails fast before the admin call.
#[tokio::test]
async fn test_empty_token_is_uninitialized() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": ""})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server)
        .update_user(&user_payload(), "u1")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Uninitialized));

    Ok(())
}

/// Tests that a successful create returns the id found by username lookup.
#[tokio::test]
async fn test_create_user_returns_looked_up_id() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let record = user_payload();
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .and(body_json(&record))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("location", format!("{}{USERS_PATH}/new-id", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_lookup(&server, "a@x.com", json!([{"id": "new-id", "username": "a@x.com"}])).await;

    let id = provider(&server).create_user(&record).await?;
    assert_eq!(id, "new-id");

    Ok(())
}

/// Tests that a username conflict converges to exactly one update of the existing user.
#[tokio::test]
async fn test_create_user_conflict_updates_existing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let record = user_payload();
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"errorMessage": "User exists with same username"})),
        )
        .mount(&server)
        .await;
    mount_lookup(&server, "a@x.com", json!([{"id": "existing-id"}, {"id": "other"}])).await;

    Mock::given(method("PUT"))
        .and(path(format!("{USERS_PATH}/existing-id")))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let id = provider(&server).create_user(&record).await?;
    assert_eq!(id, "existing-id");

    Ok(())
}

/// Tests that creating the same user twice yields the same id both times.
#[tokio::test]
async fn test_create_user_is_idempotent_under_conflict() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"errorMessage": "User exists with same username"})),
        )
        .mount(&server)
        .await;
    mount_lookup(&server, "a@x.com", json!([{"id": "same-id"}])).await;
    Mock::given(method("PUT"))
        .and(path(format!("{USERS_PATH}/same-id")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(&server);
    let first = provider.create_user(&user_payload()).await?;
    let second = provider.create_user(&user_payload()).await?;

    assert_eq!(first, "same-id");
    assert_eq!(first, second);

    Ok(())
}

/// Tests that an empty lookup after create is a typed error.
#[tokio::test]
async fn test_create_user_with_no_match_is_not_found_after_create() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    mount_lookup(&server, "a@x.com", json!([])).await;

    let err = provider(&server)
        .create_user(&user_payload())
        .await
        .unwrap_err();

    match err {
        AdminError::UserNotFoundAfterCreate { username } => assert_eq!(username, "a@x.com"),
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

/// Tests that other create failures are wrapped with the target email.
#[tokio::test]
async fn test_create_user_other_failure_is_creation_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(USERS_PATH))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"errorMessage": "error-invalid-email"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server)
        .create_user(&user_payload())
        .await
        .unwrap_err();

    match &err {
        AdminError::UserCreation { email, source } => {
            assert_eq!(email, "a@x.com");
            assert_eq!(source.status(), Some(400));
            assert!(!source.is_user_exists());
        }
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

/// Tests that a record without username or email is rejected locally.
#[tokio::test]
async fn test_create_user_without_identity_is_validation_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    let err = provider(&server)
        .create_user(&UserRecord::default().with_first_name("Nobody"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());

    Ok(())
}

/// Tests the normalized view built from a Keycloak user.
#[tokio::test]
async fn test_get_user_returns_normalized_view() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/u1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "username": "ada",
            "enabled": true,
            "emailVerified": true,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "createdTimestamp": 1_700_000_000_000_i64,
            "attributes": {"dept": ["eng"]},
            "totp": false,
        })))
        .mount(&server)
        .await;

    let view = provider(&server).get_user("u1").await?;

    assert!(view.enabled);
    assert_eq!(view.user_create_date, Some(1_700_000_000_000));
    assert_eq!(view.user_last_modified_date, Some(1_700_000_000_000));
    assert_eq!(
        view.user_attributes,
        vec![
            UserAttribute::new("sub", "u1"),
            UserAttribute::new("emailVerified", "true"),
            UserAttribute::new("given_name", "Ada"),
            UserAttribute::new("family_name", "Lovelace"),
            UserAttribute::new("email", "ada@example.com"),
            UserAttribute::new("dept", "eng"),
        ]
    );

    Ok(())
}

/// Tests that a missing user is a lookup error carrying the status.
#[tokio::test]
async fn test_get_user_not_found_is_lookup_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/missing")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})),
        )
        .mount(&server)
        .await;

    let err = provider(&server).get_user("missing").await.unwrap_err();

    assert!(matches!(err, AdminError::UserLookup { ref user_id, .. } if user_id == "missing"));
    assert_eq!(err.status(), Some(404));

    Ok(())
}

/// Tests that an unparseable user body is a lookup error.
#[tokio::test]
async fn test_get_user_malformed_body_is_lookup_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(format!("{USERS_PATH}/u1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).get_user("u1").await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::UserLookup {
            source: RemoteError::Json(_),
            ..
        }
    ));

    Ok(())
}

/// Tests that listing without a query sends only the result cap.
#[tokio::test]
async fn test_list_users_without_query_sends_cap_only() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "u1", "username": "ada"},
            {"id": "u2", "username": "grace"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = provider(&server).list_users(None).await?;
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].username, "grace");

    let requests = server.received_requests().await.unwrap_or_default();
    let list = requests
        .iter()
        .find(|r| r.url.path() == USERS_PATH)
        .expect("list request");
    assert_eq!(list.url.query(), Some("max=10000"));

    Ok(())
}

/// Tests that a caller query is forwarded with the cap appended.
#[tokio::test]
async fn test_list_users_appends_cap_to_query() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .and(query_param("role", "admin"))
        .and(query_param("max", "10000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let users = provider(&server).list_users(Some("?role=admin")).await?;
    assert!(users.is_empty());

    let requests = server.received_requests().await.unwrap_or_default();
    let list = requests
        .iter()
        .find(|r| r.url.path() == USERS_PATH)
        .expect("list request");
    assert_eq!(list.url.query(), Some("role=admin&max=10000"));

    Ok(())
}

/// Tests that a failed listing is a list error.
#[tokio::test]
async fn test_list_users_failure_is_list_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("GET"))
        .and(path(USERS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "HTTP 403 Forbidden"})))
        .mount(&server)
        .await;

    let err = provider(&server).list_users(Some("search=ada")).await.unwrap_err();
    assert!(matches!(err, AdminError::UserList { .. }));
    assert_eq!(err.status(), Some(403));

    Ok(())
}

/// Tests that delete passes the raw response through.
#[tokio::test]
async fn test_delete_user_returns_raw_response() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("{USERS_PATH}/u1")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204).insert_header("x-request-id", "req-42"))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server).delete_user("u1").await?;

    assert_eq!(response.status.as_u16(), 204);
    assert_eq!(
        response.headers.get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
    assert!(response.body.is_empty());

    Ok(())
}

/// Tests that a failed delete is a deletion error.
#[tokio::test]
async fn test_delete_user_failure_is_deletion_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("DELETE"))
        .and(path(format!("{USERS_PATH}/gone")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "User not found"})))
        .mount(&server)
        .await;

    let err = provider(&server).delete_user("gone").await.unwrap_err();

    match err {
        AdminError::UserDeletion { user_id, source } => {
            assert_eq!(user_id, "gone");
            assert_eq!(source.to_string(), "remote returned 404: User not found");
        }
        other => panic!("unexpected error: {other}"),
    }

    Ok(())
}

/// Tests that update sends the payload to the user's endpoint.
#[tokio::test]
async fn test_update_user_puts_payload() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let record = user_payload().with_last_name("Lovelace");
    Mock::given(method("PUT"))
        .and(path(format!("{USERS_PATH}/u1")))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server).update_user(&record, "u1").await?;

    Ok(())
}

/// Tests that update failures propagate instead of being swallowed.
#[tokio::test]
async fn test_update_user_failure_is_update_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("{USERS_PATH}/u1")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = provider(&server)
        .update_user(&user_payload(), "u1")
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::UserUpdate { ref user_id, .. } if user_id == "u1"));
    assert_eq!(err.status(), Some(500));

    Ok(())
}

/// Tests the public exact-username lookup.
#[tokio::test]
async fn test_find_users_by_username() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_lookup(&server, "ada", json!([{"id": "u1", "username": "ada"}])).await;

    let users = provider(&server).find_users_by_username("ada").await?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, "u1");

    Ok(())
}
