#![allow(clippy::unwrap_used)]

//! Session lifecycle against a mocked Spectrum Service.

use std::sync::Arc;

use secrecy::SecretString;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tvws_core::{CoreError, MemoryTokenStore, SessionGate, TokenStore};

/// Test-side handle that keeps the backing store observable after the
/// gate has taken ownership of its `Box<dyn TokenStore>`.
struct SharedStore(Arc<MemoryTokenStore>);

impl TokenStore for SharedStore {
    fn load(&self) -> Option<String> {
        self.0.load()
    }
    fn store(&self, token: &str) {
        self.0.store(token);
    }
    fn clear(&self) {
        self.0.clear();
    }
}

fn client_for(server: &MockServer) -> tvws_api::SpectrumClient {
    tvws_api::SpectrumClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    )
}

fn identity_json() -> serde_json::Value {
    serde_json::json!({
        "id": "u1",
        "email": "analyst@example.com",
        "role": "user",
        "name": "Analyst"
    })
}

#[tokio::test]
async fn restored_token_is_sent_on_first_use() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(identity_json()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("stored-token"));
    let gate = SessionGate::new(client_for(&server), Box::new(SharedStore(Arc::clone(&store))));

    assert!(gate.is_authenticated(), "restored token should be installed");
    let identity = gate.current_identity().await.unwrap().unwrap();
    assert_eq!(identity.email, "analyst@example.com");
}

#[tokio::test]
async fn authenticate_installs_and_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(serde_json::json!({
            "email": "analyst@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "user": identity_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let gate = SessionGate::new(client_for(&server), Box::new(SharedStore(Arc::clone(&store))));
    assert!(!gate.is_authenticated());

    let identity = gate
        .authenticate("analyst@example.com", &SecretString::from("hunter2"))
        .await
        .unwrap();

    assert_eq!(identity.name, "Analyst");
    assert!(gate.is_authenticated());
    assert_eq!(store.load().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn rejected_login_leaves_no_session_behind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let gate = SessionGate::new(client_for(&server), Box::new(SharedStore(Arc::clone(&store))));

    let err = gate
        .authenticate("analyst@example.com", &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Auth { .. }), "got {err:?}");
    assert!(!gate.is_authenticated());
    assert_eq!(store.load(), None);
}

#[tokio::test]
async fn expired_session_auto_deauthenticates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "detail": "Token expired" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("expired-token"));
    let gate = SessionGate::new(client_for(&server), Box::new(SharedStore(Arc::clone(&store))));

    let identity = gate.current_identity().await.unwrap();

    assert!(identity.is_none());
    assert!(!gate.is_authenticated(), "client should drop the credential");
    assert_eq!(store.load(), None, "durable store should be cleared too");
}

#[tokio::test]
async fn no_token_means_no_network_call() {
    // Zero mounted expectations: any request would fail the 404 check
    // below by matching nothing and would trip `expect` verification.
    let server = MockServer::start().await;

    let gate = SessionGate::new(client_for(&server), Box::new(MemoryTokenStore::new()));

    let identity = gate.current_identity().await.unwrap();
    assert!(identity.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}
