#![allow(clippy::unwrap_used)]
// Integration tests for `SpectrumClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tvws_api::{ChannelStatus, Error, QueryRequest, SpectrumClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SpectrumClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SpectrumClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn secret(s: &str) -> secrecy::SecretString {
    s.to_string().into()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "op@example.com",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "user": {
                "id": "u1",
                "email": "op@example.com",
                "role": "admin",
                "name": "Operator"
            }
        })))
        .mount(&server)
        .await;

    let session = client
        .login("op@example.com", &secret("hunter2"))
        .await
        .unwrap();

    assert_eq!(session.access_token, "tok-123");
    assert_eq!(session.user.email, "op@example.com");
    assert_eq!(session.user.name, "Operator");
}

#[tokio::test]
async fn test_login_rejected_surfaces_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let result = client.login("op@example.com", &secret("wrong")).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_current_user_attaches_bearer_token() {
    let (server, client) = setup().await;
    client.set_token("tok-123".into());

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "op@example.com",
            "role": "user",
            "name": "Operator"
        })))
        .mount(&server)
        .await;

    let identity = client.current_user().await.unwrap();
    assert_eq!(identity.id, "u1");
}

// ── Catalog tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_states() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/states"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "s1", "name": "Edo" },
            { "_id": "s2", "name": "Lagos" }
        ])))
        .mount(&server)
        .await;

    let regions = client.list_states().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].name, "Edo");
    assert_eq!(regions[1].id, "s2");
}

#[tokio::test]
async fn test_list_locations_percent_encodes_region() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/locations/Akwa%20Ibom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "l1",
            "state": "Akwa Ibom",
            "name": "Uyo",
            "coordinates": { "lat": 5.04, "lon": 7.92 }
        }])))
        .mount(&server)
        .await;

    let sites = client.list_locations("Akwa Ibom").await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].region, "Akwa Ibom");
    assert_eq!(sites[0].name, "Uyo");
}

// ── Query tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_tvws() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .and(body_json(json!({
            "state": "Edo",
            "location": "Benin",
            "time": "2025-01-20T14:30:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "channels": [
                { "channel": 21, "frequency_mhz": 470.0,
                  "signal_strength_dbm": -95.2, "status": "free" },
                { "channel": 22, "frequency_mhz": 478.0,
                  "signal_strength_dbm": -61.0, "status": "occupied" }
            ],
            "totalAvailableBandwidth": 8.0,
            "location": {
                "_id": "l1", "state": "Edo", "name": "Benin",
                "coordinates": { "lat": 6.34, "lon": 5.63 }
            },
            "queryTime": "2025-01-20T14:30:00Z"
        })))
        .mount(&server)
        .await;

    let result = client
        .query_tvws(&QueryRequest {
            region: "Edo".into(),
            site: "Benin".into(),
            time: "2025-01-20T14:30:00Z".into(),
        })
        .await
        .unwrap();

    assert_eq!(result.channels.len(), 2);
    assert_eq!(result.channels[0].status, ChannelStatus::Free);
    assert_eq!(result.free_count(), 1);
    assert_eq!(result.occupied_count(), 1);
    assert!((result.total_available_bandwidth_mhz - 8.0).abs() < f64::EPSILON);
    assert_eq!(result.site.name, "Benin");
}

#[tokio::test]
async fn test_query_rejection_carries_detail() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "detail": "No measurements for location" })),
        )
        .mount(&server)
        .await;

    let result = client
        .query_tvws(&QueryRequest {
            region: "Edo".into(),
            site: "Nowhere".into(),
            time: "2025-01-20T14:30:00Z".into(),
        })
        .await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "No measurements for location");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_long_body_reports_a_truncated_preview() {
    let (server, client) = setup().await;

    // Multi-byte character straddling the 200-byte mark, so a byte-index
    // truncation of the preview would panic mid-character.
    let mut raw = "a".repeat(199);
    raw.push('é');
    raw.push_str(&"b".repeat(50));

    Mock::given(method("GET"))
        .and(path("/states"))
        .respond_with(ResponseTemplate::new(200).set_body_string(raw.clone()))
        .mount(&server)
        .await;

    let result = client.list_states().await;

    match result {
        Err(Error::Deserialization {
            ref message,
            ref body,
        }) => {
            assert!(message.contains("body preview"), "got message: {message}");
            assert_eq!(body, &raw);
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_opaque_error_body_falls_back_to_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/states"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_states().await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"), "got message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
