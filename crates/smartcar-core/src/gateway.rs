//! UpstreamGateway trait - the seam between the translator and the GM API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VehicleResult;
use crate::models::{
    ActionResult, EngineCommand, EnergyData, Envelope, SecurityData, VehicleInfoData,
};

/// The four upstream services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpstreamOperation {
    VehicleInfo,
    SecurityStatus,
    EnergyData,
    EngineControl,
}

impl UpstreamOperation {
    /// Service path segment on the upstream API
    pub fn service(&self) -> &'static str {
        match self {
            UpstreamOperation::VehicleInfo => "getVehicleInfoService",
            UpstreamOperation::SecurityStatus => "getSecurityStatusService",
            UpstreamOperation::EnergyData => "getEnergyService",
            UpstreamOperation::EngineControl => "actionEngineService",
        }
    }

    /// Client-facing message used when the upstream envelope reports a failure
    pub fn failure_message(&self) -> &'static str {
        match self {
            UpstreamOperation::VehicleInfo => "Error fetching vehicle info from GM API",
            UpstreamOperation::SecurityStatus => "Error fetching security status from GM API",
            UpstreamOperation::EnergyData => "Error fetching energy data from GM API",
            UpstreamOperation::EngineControl => "Error controlling the engine via GM API",
        }
    }
}

impl std::fmt::Display for UpstreamOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.service())
    }
}

/// Typed client for the GM-shaped upstream API.
///
/// Implementations must only return envelopes whose `status` is `"200"`;
/// any other status becomes [`VehicleError::UpstreamStatus`](crate::VehicleError),
/// and network or HTTP failures become [`VehicleError::Transport`](crate::VehicleError).
/// No schema translation happens here.
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// `POST getVehicleInfoService`
    async fn fetch_vehicle_info(&self, id: &str) -> VehicleResult<Envelope<VehicleInfoData>>;

    /// `POST getSecurityStatusService`
    async fn fetch_security_status(&self, id: &str) -> VehicleResult<Envelope<SecurityData>>;

    /// `POST getEnergyService`
    async fn fetch_energy_data(&self, id: &str) -> VehicleResult<Envelope<EnergyData>>;

    /// `POST actionEngineService`
    async fn control_engine(
        &self,
        id: &str,
        command: EngineCommand,
    ) -> VehicleResult<Envelope<ActionResult>>;
}
