#![allow(clippy::unwrap_used)]

//! Query execution against a mocked Spectrum Service.

use chrono::NaiveDateTime;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tvws_api::{ChannelStatus, SpectrumClient};
use tvws_core::{CoreError, QueryExecutor};

fn client_for(server: &MockServer) -> SpectrumClient {
    SpectrumClient::with_client(reqwest::Client::new(), Url::parse(&server.uri()).unwrap())
}

fn naive(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
}

fn result_json(site: &str, channel: u8) -> serde_json::Value {
    serde_json::json!({
        "channels": [
            {
                "channel": channel,
                "frequency_mhz": 470.0,
                "signal_strength_dbm": -95.2,
                "status": "free"
            },
            {
                "channel": channel + 1,
                "frequency_mhz": 478.0,
                "signal_strength_dbm": -61.0,
                "status": "occupied"
            }
        ],
        "totalAvailableBandwidth": 8.0,
        "location": {
            "_id": "l1",
            "state": "Edo",
            "name": site,
            "coordinates": { "lat": 6.34, "lon": 5.63 }
        },
        "queryTime": "2025-01-20T14:30:00Z"
    })
}

#[tokio::test]
async fn successful_query_is_held_as_latest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .and(body_partial_json(serde_json::json!({
            "state": "Edo",
            "location": "Benin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_json("Benin", 21)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut executor = QueryExecutor::new();
    assert!(executor.latest().is_none());

    let result = executor
        .run_query(&client, "Edo", "Benin", naive("2025-01-20T14:30"))
        .await
        .unwrap();

    assert_eq!(result.channels.len(), 2);
    assert_eq!(result.channels[0].status, ChannelStatus::Free);
    assert_eq!(result.free_count(), 1);
    assert_eq!(result.site.name, "Benin");

    let latest = executor.latest().unwrap();
    assert_eq!(latest.site.name, "Benin");
}

#[tokio::test]
async fn next_query_replaces_the_previous_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .and(body_partial_json(serde_json::json!({ "location": "Benin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_json("Benin", 21)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .and(body_partial_json(serde_json::json!({ "location": "Auchi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(result_json("Auchi", 40)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut executor = QueryExecutor::new();

    executor
        .run_query(&client, "Edo", "Benin", naive("2025-01-20T14:30"))
        .await
        .unwrap();
    executor
        .run_query(&client, "Edo", "Auchi", naive("2025-01-20T15:00"))
        .await
        .unwrap();

    let latest = executor.latest().unwrap();
    assert_eq!(latest.site.name, "Auchi");
    assert_eq!(latest.channels[0].channel, 40);
}

#[tokio::test]
async fn remote_rejection_carries_the_service_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query-tvws"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            serde_json::json!({ "detail": "No measurements found for this location and time" }),
        ))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut executor = QueryExecutor::new();

    let err = executor
        .run_query(&client, "Edo", "Benin", naive("2025-01-20T14:30"))
        .await
        .unwrap_err();

    match err {
        CoreError::Query { message } => {
            assert!(message.contains("No measurements found"), "got: {message}");
        }
        other => panic!("expected Query error, got {other:?}"),
    }
    assert!(executor.latest().is_none(), "failed query must not store a result");
}
