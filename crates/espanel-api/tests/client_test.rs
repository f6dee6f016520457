// Integration tests for `DeviceClient` using wiremock.
#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use espanel_api::{DeviceClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let client = DeviceClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_switch_state() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/switch/relay1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "switch-relay1",
            "state": "ON",
            "value": true
        })))
        .mount(&server)
        .await;

    assert!(client.switch_state("relay1").await.unwrap());
}

#[tokio::test]
async fn test_set_switch_posts_on_off_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/switch/relay3"))
        .and(body_json(json!({ "state": "OFF" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.set_switch("relay3", false).await.unwrap();
}

#[tokio::test]
async fn test_binary_sensor_state_variants() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/binary_sensor/input1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "ON" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/binary_sensor/input2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": false })))
        .mount(&server)
        .await;

    let s1 = client.binary_sensor_state("input1").await.unwrap();
    assert_eq!(s1.state.as_deref(), Some("ON"));
    assert_eq!(s1.value, None);

    let s2 = client.binary_sensor_state("input2").await.unwrap();
    assert_eq!(s2.state, None);
    assert_eq!(s2.value, Some(false));
}

#[tokio::test]
async fn test_sensor_state_numeric_string() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensor/a1_volts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": "3.14159" })))
        .mount(&server)
        .await;

    let state = client.sensor_state("a1_volts").await.unwrap();
    assert_eq!(state.as_deref(), Some("3.14159"));
}

#[tokio::test]
async fn test_set_number_posts_numeric_value() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/number/rf_pulse_len"))
        .and(body_json(json!({ "value": 350.0 })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.set_number("rf_pulse_len", 350.0).await.unwrap();
}

#[tokio::test]
async fn test_set_select_posts_option() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/select/rf_protocol_select"))
        .and(body_json(json!({ "option": "Protocol 2" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .set_select("rf_protocol_select", "Protocol 2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_button_press_empty_body_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/button/transmit_slot/press"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.press_button("transmit_slot").await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_404_unmapped_identifier() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/switch/relay9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.switch_state("relay9").await;
    match result {
        Err(Error::Http { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected Http 404, got: {other:?}"),
    }
    assert!(client.switch_state("relay9").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_error_500_with_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sensor/a2_volts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("flash write failed"))
        .mount(&server)
        .await;

    match client.sensor_state("a2_volts").await {
        Err(Error::Http { status, ref body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "flash write failed");
        }
        other => panic!("expected Http 500, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_malformed_json() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/switch/relay1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.switch_state("relay1").await,
        Err(Error::Deserialization { .. })
    ));
}

#[tokio::test]
async fn test_error_long_multibyte_body_is_reported_not_fatal() {
    let (server, client) = setup().await;

    // 100 euro signs = 300 bytes of non-JSON; the error preview must cut
    // on a character boundary instead of panicking mid-character.
    Mock::given(method("GET"))
        .and(path("/switch/relay1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("€".repeat(100)))
        .mount(&server)
        .await;

    match client.switch_state("relay1").await {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains('€'), "preview missing from: {message}");
        }
        other => panic!("expected Deserialization, got: {other:?}"),
    }
}

// ── Fallback dispatch ───────────────────────────────────────────────

#[tokio::test]
async fn test_fallback_stops_at_first_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/button/save_learned_slot/press"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/button/save_learned__slot/press"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/button/save_learned___slot/press"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .press_button_with_fallback(&[
            "save_learned_slot",
            "save_learned__slot",
            "save_learned___slot",
            "never_tried",
        ])
        .await
        .unwrap();

    // First two candidates rejected, third succeeded; the fourth never ran.
    let requests = server.received_requests().await.unwrap();
    let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_owned()).collect();
    assert_eq!(
        paths,
        vec![
            "/button/save_learned_slot/press",
            "/button/save_learned__slot/press",
            "/button/save_learned___slot/press",
        ]
    );
}

#[tokio::test]
async fn test_fallback_exhausted_names_every_identifier() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client
        .press_button_with_fallback(&["primary", "alt_one", "alt_two"])
        .await;

    match result {
        Err(Error::ButtonNotFound { ref tried }) => {
            assert_eq!(tried, &["primary", "alt_one", "alt_two"]);
        }
        other => panic!("expected ButtonNotFound, got: {other:?}"),
    }
}
