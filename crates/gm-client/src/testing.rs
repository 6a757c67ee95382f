//! Test utilities for gm-client
//!
//! Provides an in-process HTTP server for axum routers and a mock GM API
//! that serves canned envelopes in the upstream wire format.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{GmClient, Result};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve an axum Router on an ephemeral local port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use gm_client::testing::TestServer;
    ///
    /// let server = TestServer::start(router).await?;
    /// let body = reqwest::get(format!("{}/health", server.base_url())).await?;
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// =============================================================================
// Mock GM API
// =============================================================================

/// Vehicle served by [`MockGmServer`]
#[derive(Debug, Clone)]
pub struct MockVehicle {
    pub vin: String,
    pub color: String,
    pub four_door_sedan: bool,
    pub two_door_coupe: bool,
    pub drive_train: String,
    /// `(location, locked)` in upstream order
    pub doors: Vec<(String, bool)>,
    pub tank_level: Option<String>,
    pub battery_level: Option<String>,
}

impl MockVehicle {
    /// Vehicle `1234`: four-door sedan with a v8
    pub fn sedan() -> Self {
        Self {
            vin: "123123412412".to_string(),
            color: "Metallic Silver".to_string(),
            four_door_sedan: true,
            two_door_coupe: false,
            drive_train: "v8".to_string(),
            doors: vec![
                ("frontLeft".to_string(), false),
                ("frontRight".to_string(), true),
                ("backLeft".to_string(), false),
                ("backRight".to_string(), true),
            ],
            tank_level: Some("30.2".to_string()),
            battery_level: None,
        }
    }

    /// Vehicle `1235`: two-door electric coupe
    pub fn electric_coupe() -> Self {
        Self {
            vin: "1235AZ91XP".to_string(),
            color: "Forest Green".to_string(),
            four_door_sedan: false,
            two_door_coupe: true,
            drive_train: "electric".to_string(),
            doors: vec![
                ("frontLeft".to_string(), true),
                ("frontRight".to_string(), true),
            ],
            tank_level: None,
            battery_level: Some("73.2".to_string()),
        }
    }
}

/// A request received by [`MockGmServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub service: &'static str,
    pub body: Value,
}

#[derive(Debug)]
struct MockGmState {
    vehicles: RwLock<HashMap<String, MockVehicle>>,
    requests: Mutex<Vec<RecordedRequest>>,
    engine_outcome: RwLock<String>,
    http_failure: RwLock<Option<StatusCode>>,
    latency: RwLock<Duration>,
}

impl MockGmState {
    fn new() -> Self {
        let mut vehicles = HashMap::new();
        vehicles.insert("1234".to_string(), MockVehicle::sedan());
        vehicles.insert("1235".to_string(), MockVehicle::electric_coupe());

        Self {
            vehicles: RwLock::new(vehicles),
            requests: Mutex::new(Vec::new()),
            engine_outcome: RwLock::new("EXECUTED".to_string()),
            http_failure: RwLock::new(None),
            latency: RwLock::new(Duration::ZERO),
        }
    }

    /// Record the request, apply latency, and short-circuit injected HTTP failures
    async fn accept(&self, service: &'static str, body: &Value) -> Option<Response> {
        self.requests.lock().push(RecordedRequest {
            service,
            body: body.clone(),
        });

        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let failure = *self.http_failure.read();
        failure.map(|status| (status, "Injected failure").into_response())
    }

    fn vehicle(&self, body: &Value) -> std::result::Result<MockVehicle, Value> {
        let id = body.get("id").and_then(Value::as_str).unwrap_or_default();
        self.vehicles.read().get(id).cloned().ok_or_else(|| {
            json!({
                "status": "404",
                "reason": format!("Vehicle id: {} not found.", id)
            })
        })
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn level(value: &Option<String>) -> Value {
    match value {
        Some(v) => json!({ "type": "Number", "value": v }),
        None => json!({ "type": "Null", "value": null }),
    }
}

async fn vehicle_info(State(state): State<Arc<MockGmState>>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.accept("getVehicleInfoService", &body).await {
        return failure;
    }
    let vehicle = match state.vehicle(&body) {
        Ok(vehicle) => vehicle,
        Err(not_found) => return Json(not_found).into_response(),
    };

    Json(json!({
        "service": "getVehicleInfo",
        "status": "200",
        "data": {
            "vin": { "type": "String", "value": vehicle.vin },
            "color": { "type": "String", "value": vehicle.color },
            "fourDoorSedan": { "type": "Boolean", "value": flag(vehicle.four_door_sedan) },
            "twoDoorCoupe": { "type": "Boolean", "value": flag(vehicle.two_door_coupe) },
            "driveTrain": { "type": "String", "value": vehicle.drive_train }
        }
    }))
    .into_response()
}

async fn security_status(
    State(state): State<Arc<MockGmState>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(failure) = state.accept("getSecurityStatusService", &body).await {
        return failure;
    }
    let vehicle = match state.vehicle(&body) {
        Ok(vehicle) => vehicle,
        Err(not_found) => return Json(not_found).into_response(),
    };

    let values: Vec<Value> = vehicle
        .doors
        .iter()
        .map(|(location, locked)| {
            json!({
                "location": { "type": "String", "value": location },
                "locked": { "type": "Boolean", "value": flag(*locked) }
            })
        })
        .collect();

    Json(json!({
        "service": "getSecurityStatus",
        "status": "200",
        "data": {
            "doors": { "type": "Array", "values": values }
        }
    }))
    .into_response()
}

async fn energy(State(state): State<Arc<MockGmState>>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.accept("getEnergyService", &body).await {
        return failure;
    }
    let vehicle = match state.vehicle(&body) {
        Ok(vehicle) => vehicle,
        Err(not_found) => return Json(not_found).into_response(),
    };

    Json(json!({
        "service": "getEnergyService",
        "status": "200",
        "data": {
            "tankLevel": level(&vehicle.tank_level),
            "batteryLevel": level(&vehicle.battery_level)
        }
    }))
    .into_response()
}

async fn action_engine(State(state): State<Arc<MockGmState>>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = state.accept("actionEngineService", &body).await {
        return failure;
    }
    if let Err(not_found) = state.vehicle(&body) {
        return Json(not_found).into_response();
    }

    let command = body.get("command").and_then(Value::as_str).unwrap_or_default();
    if command != "START_VEHICLE" && command != "STOP_VEHICLE" {
        return Json(json!({
            "status": "400",
            "reason": format!("Invalid command: {}", command)
        }))
        .into_response();
    }

    let outcome = state.engine_outcome.read().clone();
    Json(json!({
        "service": "actionEngine",
        "status": "200",
        "actionResult": { "status": outcome }
    }))
    .into_response()
}

fn mock_router(state: Arc<MockGmState>) -> Router {
    Router::new()
        .route("/getVehicleInfoService", post(vehicle_info))
        .route("/getSecurityStatusService", post(security_status))
        .route("/getEnergyService", post(energy))
        .route("/actionEngineService", post(action_engine))
        .with_state(state)
}

/// In-process stand-in for the GM vehicle API
///
/// Serves vehicles `1234` ([`MockVehicle::sedan`]) and `1235`
/// ([`MockVehicle::electric_coupe`]) by default. Unknown ids get a
/// `"404"` envelope over HTTP 200, like the real service.
pub struct MockGmServer {
    server: TestServer,
    prefix: String,
    state: Arc<MockGmState>,
}

impl MockGmServer {
    /// Start the mock at the server root
    pub async fn start() -> Result<Self> {
        Self::start_nested("").await
    }

    /// Start the mock under a path prefix such as `/gm`
    pub async fn start_nested(prefix: &str) -> Result<Self> {
        let state = Arc::new(MockGmState::new());
        let router = if prefix.is_empty() {
            mock_router(state.clone())
        } else {
            Router::new().nest(prefix, mock_router(state.clone()))
        };
        let server = TestServer::start(router).await?;

        Ok(Self {
            server,
            prefix: prefix.to_string(),
            state,
        })
    }

    /// Base URL to hand to [`GmClient`]
    pub fn base_url(&self) -> String {
        format!("{}{}", self.server.base_url(), self.prefix)
    }

    /// A client pointed at this mock with short timeouts
    pub fn client(&self) -> Result<GmClient> {
        self.client_with_timeout(Duration::from_secs(5))
    }

    /// A client pointed at this mock with a custom request timeout
    pub fn client_with_timeout(&self, timeout: Duration) -> Result<GmClient> {
        GmClient::with_config(&self.base_url(), timeout, Duration::from_secs(2))
    }

    /// Add or replace a vehicle
    pub fn insert_vehicle(&self, id: impl Into<String>, vehicle: MockVehicle) {
        self.state.vehicles.write().insert(id.into(), vehicle);
    }

    /// Status reported in `actionResult` for valid engine commands
    pub fn set_engine_outcome(&self, status: impl Into<String>) {
        *self.state.engine_outcome.write() = status.into();
    }

    /// Answer every request with this HTTP status (`None` to stop)
    pub fn fail_with_http_status(&self, status: Option<StatusCode>) {
        *self.state.http_failure.write() = status;
    }

    /// Delay every response
    pub fn set_latency(&self, latency: Duration) {
        *self.state.latency.write() = latency;
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_encoding() {
        assert_eq!(flag(true), "True");
        assert_eq!(flag(false), "False");
    }

    #[test]
    fn test_null_level_encoding() {
        assert_eq!(level(&None), json!({ "type": "Null", "value": null }));
    }
}
