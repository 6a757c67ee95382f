//! Tests for GmClient against the in-process mock GM API
//!
//! Covers the wire format sent upstream, envelope status checking, and how
//! transport failures surface.

use std::time::Duration;

use axum::http::StatusCode;
use gm_client::testing::{MockGmServer, MockVehicle};
use gm_client::GmClient;
use pretty_assertions::assert_eq;
use serde_json::json;
use smartcar_core::{
    translator, ActionStatus, EngineCommand, UpstreamGateway, UpstreamOperation, VehicleError,
};

async fn start_mock() -> (MockGmServer, GmClient) {
    let gm = MockGmServer::start()
        .await
        .expect("Failed to start mock GM server");
    let client = gm.client().expect("Failed to build client");
    (gm, client)
}

// =============================================================================
// Successful calls
// =============================================================================

#[tokio::test]
async fn test_fetch_vehicle_info() {
    let (_gm, client) = start_mock().await;

    let envelope = client.fetch_vehicle_info("1234").await.unwrap();
    assert!(envelope.is_success());
    assert_eq!(envelope.service, "getVehicleInfo");

    let data = envelope.data.unwrap();
    assert_eq!(data.vin.value, "123123412412");
    assert_eq!(data.color.value, "Metallic Silver");
    assert!(data.four_door_sedan.is_true());
    assert_eq!(data.drive_train.value, "v8");
}

#[tokio::test]
async fn test_fetch_security_status_keeps_order() {
    let (_gm, client) = start_mock().await;

    let data = client
        .fetch_security_status("1234")
        .await
        .unwrap()
        .data
        .unwrap();

    let locations: Vec<&str> = data
        .doors
        .values
        .iter()
        .map(|d| d.location.value.as_str())
        .collect();
    assert_eq!(
        locations,
        vec!["frontLeft", "frontRight", "backLeft", "backRight"]
    );
}

#[tokio::test]
async fn test_fetch_energy_with_null_level() {
    let (_gm, client) = start_mock().await;

    let data = client.fetch_energy_data("1235").await.unwrap().data.unwrap();
    assert_eq!(data.tank_level.value, None);
    assert_eq!(data.battery_level.as_percent(), 73.2);
}

#[tokio::test]
async fn test_control_engine_sends_command_code() {
    let (gm, client) = start_mock().await;

    let result = client
        .control_engine("1234", EngineCommand::Start)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(result.status, ActionStatus::Executed);

    let requests = gm.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].service, "actionEngineService");
    assert_eq!(
        requests[0].body,
        json!({ "id": "1234", "command": "START_VEHICLE", "responseType": "JSON" })
    );
}

#[tokio::test]
async fn test_request_body_includes_response_type() {
    let (gm, client) = start_mock().await;

    client.fetch_energy_data("1234").await.unwrap();

    let requests = gm.requests();
    assert_eq!(requests[0].service, "getEnergyService");
    assert_eq!(requests[0].body, json!({ "id": "1234", "responseType": "JSON" }));
}

#[tokio::test]
async fn test_engine_failed_outcome_is_not_an_error() {
    let (gm, client) = start_mock().await;
    gm.set_engine_outcome("FAILED");

    let result = client
        .control_engine("1234", EngineCommand::Stop)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(result.status, ActionStatus::Failed);
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let gm = MockGmServer::start_nested("/gm").await.unwrap();
    let client = gm.client().unwrap();

    assert!(gm.base_url().ends_with("/gm"));
    let envelope = client.fetch_vehicle_info("1235").await.unwrap();
    assert!(envelope.is_success());
}

// =============================================================================
// Upstream status failures
// =============================================================================

#[tokio::test]
async fn test_unknown_vehicle_is_upstream_status_error() {
    let (_gm, client) = start_mock().await;

    let err = client.fetch_vehicle_info("9999").await.unwrap_err();
    assert_eq!(
        err,
        VehicleError::upstream_status(
            UpstreamOperation::VehicleInfo,
            Some("404".to_string()),
            Some("Vehicle id: 9999 not found.".to_string()),
        )
    );
    assert_eq!(err.to_string(), "Error fetching vehicle info from GM API");
}

#[tokio::test]
async fn test_each_operation_names_itself_on_failure() {
    let (_gm, client) = start_mock().await;

    let err = client.fetch_security_status("0").await.unwrap_err();
    assert_eq!(err.to_string(), "Error fetching security status from GM API");

    let err = client.fetch_energy_data("0").await.unwrap_err();
    assert_eq!(err.to_string(), "Error fetching energy data from GM API");

    let err = client
        .control_engine("0", EngineCommand::Start)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Error controlling the engine via GM API");
}

// =============================================================================
// Transport failures
// =============================================================================

#[tokio::test]
async fn test_http_error_is_transport_error() {
    let (gm, client) = start_mock().await;
    gm.fail_with_http_status(Some(StatusCode::INTERNAL_SERVER_ERROR));

    let err = client.fetch_vehicle_info("1234").await.unwrap_err();
    match err {
        VehicleError::Transport {
            operation,
            message,
            timed_out,
        } => {
            assert_eq!(operation, UpstreamOperation::VehicleInfo);
            assert!(message.contains("500"), "{message}");
            assert!(!timed_out);
        }
        other => panic!("Expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let gm = MockGmServer::start().await.unwrap();
    gm.set_latency(Duration::from_millis(500));
    let client = gm.client_with_timeout(Duration::from_millis(100)).unwrap();

    let err = client.fetch_energy_data("1234").await.unwrap_err();
    assert!(
        matches!(
            err,
            VehicleError::Transport {
                timed_out: true,
                ..
            }
        ),
        "{err:?}"
    );
    assert_eq!(err.status_code(), 504);
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    // Bind then drop to obtain a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GmClient::with_config(
        &format!("http://{}", addr),
        Duration::from_secs(2),
        Duration::from_secs(1),
    )
    .unwrap();

    let err = client.fetch_vehicle_info("1234").await.unwrap_err();
    assert!(
        matches!(err, VehicleError::Transport { .. }),
        "{err:?}"
    );
}

// =============================================================================
// Translator over HTTP
// =============================================================================

#[tokio::test]
async fn test_translator_through_client() {
    let (gm, client) = start_mock().await;

    let info = translator::get_vehicle_info(&client, "1235").await.unwrap();
    assert_eq!(u8::from(info.door_count), 2);

    let level = translator::get_energy_data(&client, "1234", "fuel")
        .await
        .unwrap();
    assert_eq!(level.percent, 30.2);

    let err = translator::get_energy_data(&client, "1235", "fuel")
        .await
        .unwrap_err();
    assert_eq!(err, VehicleError::FuelUnavailable);

    gm.insert_vehicle(
        "4321",
        MockVehicle {
            drive_train: "Hybrid".to_string(),
            tank_level: Some("61".to_string()),
            battery_level: Some("12.5".to_string()),
            ..MockVehicle::sedan()
        },
    );
    let level = translator::get_energy_data(&client, "4321", "battery")
        .await
        .unwrap();
    assert_eq!(level.percent, 12.5);
}

#[tokio::test]
async fn test_missing_identifier_sends_nothing() {
    let (gm, client) = start_mock().await;

    let err = translator::get_security_status(&client, "")
        .await
        .unwrap_err();
    assert_eq!(err, VehicleError::MissingIdentifier);
    assert_eq!(gm.request_count(), 0);
}
