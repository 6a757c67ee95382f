//! Normalized (SmartCar-shaped) response models

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VehicleError;
use crate::models::upstream::EngineCommand;

/// `GET /v1/vehicles/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vin: String,
    pub color: String,
    pub door_count: DoorCount,
    pub drive_train: String,
}

/// Number of doors, inferred from the upstream body-style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DoorCount {
    Two,
    Four,
}

impl From<DoorCount> for u8 {
    fn from(count: DoorCount) -> Self {
        match count {
            DoorCount::Two => 2,
            DoorCount::Four => 4,
        }
    }
}

impl TryFrom<u8> for DoorCount {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(DoorCount::Two),
            4 => Ok(DoorCount::Four),
            _ => Err(format!("Unsupported door count: {}", n)),
        }
    }
}

/// One entry of `GET /v1/vehicles/{id}/doors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorState {
    pub location: String,
    pub locked: bool,
}

/// `GET /v1/vehicles/{id}/{fuel|battery}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevel {
    pub percent: f64,
}

/// `POST /v1/vehicles/{id}/engine`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineActionResult {
    pub status: EngineStatus,
}

/// Normalized engine command outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Success,
    Error,
}

/// Which energy reservoir a level request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Fuel,
    Battery,
}

impl EnergyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Fuel => "fuel",
            EnergyType::Battery => "battery",
        }
    }
}

impl std::fmt::Display for EnergyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuel" => Ok(EnergyType::Fuel),
            "battery" => Ok(EnergyType::Battery),
            "" => Err(VehicleError::MissingEnergyType),
            _ => Err(VehicleError::InvalidEnergyType),
        }
    }
}

/// Inbound engine action token (exact case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngineAction {
    Start,
    Stop,
}

impl EngineAction {
    /// Upstream command code for this action
    pub fn command(&self) -> EngineCommand {
        match self {
            EngineAction::Start => EngineCommand::Start,
            EngineAction::Stop => EngineCommand::Stop,
        }
    }
}

impl FromStr for EngineAction {
    type Err = VehicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(EngineAction::Start),
            "STOP" => Ok(EngineAction::Stop),
            _ => Err(VehicleError::InvalidAction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vehicle_info_wire_shape() {
        let info = VehicleInfo {
            vin: "123456".to_string(),
            color: "Red".to_string(),
            door_count: DoorCount::Four,
            drive_train: "v8".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({ "vin": "123456", "color": "Red", "doorCount": 4, "driveTrain": "v8" })
        );
    }

    #[test]
    fn test_door_count_rejects_other_numbers() {
        assert!(serde_json::from_value::<DoorCount>(json!(3)).is_err());
        assert_eq!(
            serde_json::from_value::<DoorCount>(json!(2)).unwrap(),
            DoorCount::Two
        );
    }

    #[test]
    fn test_engine_status_wire_values() {
        let result = EngineActionResult {
            status: EngineStatus::Success,
        };
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "status": "success" })
        );
        assert_eq!(
            serde_json::to_value(EngineStatus::Error).unwrap(),
            json!("error")
        );
    }

    #[test]
    fn test_energy_type_parsing() {
        assert_eq!("fuel".parse::<EnergyType>().unwrap(), EnergyType::Fuel);
        assert_eq!("battery".parse::<EnergyType>().unwrap(), EnergyType::Battery);
        assert_eq!(
            "".parse::<EnergyType>().unwrap_err(),
            VehicleError::MissingEnergyType
        );
        assert_eq!(
            "Fuel".parse::<EnergyType>().unwrap_err(),
            VehicleError::InvalidEnergyType
        );
    }

    #[test]
    fn test_engine_action_mapping() {
        assert_eq!(
            "START".parse::<EngineAction>().unwrap().command(),
            EngineCommand::Start
        );
        assert_eq!(
            "STOP".parse::<EngineAction>().unwrap().command(),
            EngineCommand::Stop
        );
        for bad in ["start", "Stop", "", "RESTART"] {
            assert_eq!(
                bad.parse::<EngineAction>().unwrap_err(),
                VehicleError::InvalidAction
            );
        }
    }
}
