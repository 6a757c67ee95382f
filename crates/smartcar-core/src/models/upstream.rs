//! GM-shaped upstream payloads
//!
//! Every upstream response is an [`Envelope`] whose primitive values are
//! wrapped as `{ "type": ..., "value": ... }` ([`Field`]) and transmitted as
//! strings. These types never leave the translation boundary.

use serde::{Deserialize, Serialize};

use crate::error::{VehicleError, VehicleResult};
use crate::gateway::UpstreamOperation;

/// The only envelope status that denotes success
pub const SUCCESS_STATUS: &str = "200";

/// `{ service, status, data | actionResult }` wrapper carried by every upstream response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Service tag echoed by the upstream
    #[serde(default)]
    pub service: String,
    /// Status code string ("200" on success)
    pub status: Option<String>,
    /// Failure description sent alongside non-200 statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Operation payload (`actionResult` for the engine service)
    #[serde(alias = "actionResult", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Build a successful envelope
    pub fn success(operation: UpstreamOperation, data: T) -> Self {
        Self {
            service: operation.service().to_string(),
            status: Some(SUCCESS_STATUS.to_string()),
            reason: None,
            data: Some(data),
        }
    }

    /// Build a failed envelope
    pub fn failure(
        operation: UpstreamOperation,
        status: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            service: operation.service().to_string(),
            status: Some(status.into()),
            reason: Some(reason.into()),
            data: None,
        }
    }

    /// Whether the envelope status is exactly "200"
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(SUCCESS_STATUS)
    }

    /// Reject envelopes whose status is not "200"
    pub fn ensure_success(self, operation: UpstreamOperation) -> VehicleResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(VehicleError::upstream_status(
                operation,
                self.status,
                self.reason,
            ))
        }
    }

    /// Check the status and take the payload.
    ///
    /// A successful envelope without a payload is treated as an upstream failure.
    pub fn into_data(self, operation: UpstreamOperation) -> VehicleResult<T> {
        let envelope = self.ensure_success(operation)?;
        match envelope.data {
            Some(data) => Ok(data),
            None => Err(VehicleError::upstream_status(
                operation,
                envelope.status,
                Some("response carried no payload".to_string()),
            )),
        }
    }
}

/// `{ type, value }` primitive wrapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field<T = String> {
    /// Upstream type tag ("String", "Boolean", "Number", ...), informational only
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Stringly-typed value
    #[serde(default)]
    pub value: T,
}

impl<T> Field<T> {
    pub fn new(kind: impl Into<String>, value: T) -> Self {
        Self {
            kind: kind.into(),
            value,
        }
    }
}

impl Field<String> {
    /// Exact `"True"` comparison used for body-style flags
    pub fn is_true(&self) -> bool {
        self.value == "True"
    }

    /// Case-insensitive `"true"` comparison; everything else is false
    pub fn as_lenient_bool(&self) -> bool {
        self.value.eq_ignore_ascii_case("true")
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl Field<Option<String>> {
    /// Parse the value as a percentage.
    ///
    /// `null`, empty, non-numeric, and non-finite values all yield `0.0`.
    pub fn as_percent(&self) -> f64 {
        self.value
            .as_deref()
            .map(str::trim)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Payload of `getVehicleInfoService`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfoData {
    pub vin: Field,
    pub color: Field,
    #[serde(default)]
    pub four_door_sedan: Field,
    #[serde(default)]
    pub two_door_coupe: Field,
    pub drive_train: Field,
}

/// Payload of `getSecurityStatusService`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityData {
    pub doors: DoorList,
}

/// `{ type: "Array", values: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoorList {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub values: Vec<DoorRecord>,
}

/// A single upstream door record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorRecord {
    pub location: Field,
    pub locked: Field,
}

/// Payload of `getEnergyService`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyData {
    #[serde(default)]
    pub tank_level: Field<Option<String>>,
    #[serde(default)]
    pub battery_level: Field<Option<String>>,
}

/// Payload of `actionEngineService` (sent as `actionResult`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: ActionStatus,
}

/// Outcome reported by the upstream for an engine command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionStatus {
    Executed,
    Failed,
    /// Any value the upstream is not documented to send
    Other(String),
}

impl From<String> for ActionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "EXECUTED" => ActionStatus::Executed,
            "FAILED" => ActionStatus::Failed,
            _ => ActionStatus::Other(s),
        }
    }
}

impl From<ActionStatus> for String {
    fn from(status: ActionStatus) -> Self {
        match status {
            ActionStatus::Executed => "EXECUTED".to_string(),
            ActionStatus::Failed => "FAILED".to_string(),
            ActionStatus::Other(s) => s,
        }
    }
}

/// Upstream engine command code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCommand {
    #[serde(rename = "START_VEHICLE")]
    Start,
    #[serde(rename = "STOP_VEHICLE")]
    Stop,
}

impl EngineCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineCommand::Start => "START_VEHICLE",
            EngineCommand::Stop => "STOP_VEHICLE",
        }
    }
}

impl std::fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
