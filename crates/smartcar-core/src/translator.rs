//! GM-to-SmartCar translation
//!
//! One function per normalized endpoint. Each validates its inputs, calls the
//! [`UpstreamGateway`] it is handed, and maps the upstream payload onto the
//! normalized model. Nothing here holds state between calls.

use tracing::{debug, instrument};

use crate::error::{VehicleError, VehicleResult};
use crate::gateway::{UpstreamGateway, UpstreamOperation};
use crate::models::{
    ActionStatus, DoorCount, DoorState, EnergyLevel, EnergyType, EngineAction,
    EngineActionResult, EngineStatus, Field, VehicleInfo,
};

/// Electric/hybrid capability inferred from the free-text drivetrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drivetrain {
    pub electric: bool,
    pub hybrid: bool,
}

impl Drivetrain {
    /// Case-insensitive substring match on "electric" and "hybrid"
    pub fn classify(drive_train: &str) -> Self {
        let lower = drive_train.to_lowercase();
        Self {
            electric: lower.contains("electric"),
            hybrid: lower.contains("hybrid"),
        }
    }

    /// Reject energy types the vehicle cannot report
    pub fn check_available(&self, energy_type: EnergyType) -> VehicleResult<()> {
        match energy_type {
            EnergyType::Fuel if self.electric && !self.hybrid => {
                Err(VehicleError::FuelUnavailable)
            }
            EnergyType::Battery if !self.electric && !self.hybrid => {
                Err(VehicleError::BatteryUnavailable)
            }
            _ => Ok(()),
        }
    }
}

/// Infer the door count from the two mutually exclusive body-style flags
pub fn infer_door_count(
    four_door_sedan: &Field,
    two_door_coupe: &Field,
) -> VehicleResult<DoorCount> {
    match (four_door_sedan.is_true(), two_door_coupe.is_true()) {
        (true, true) => Err(VehicleError::InconsistentBodyStyle),
        (true, false) => Ok(DoorCount::Four),
        (false, true) => Ok(DoorCount::Two),
        (false, false) => Err(VehicleError::UnknownBodyStyle),
    }
}

fn require_id(id: &str) -> VehicleResult<()> {
    if id.is_empty() {
        Err(VehicleError::MissingIdentifier)
    } else {
        Ok(())
    }
}

/// Translate `getVehicleInfoService` into [`VehicleInfo`]
#[instrument(level = "debug", skip(gateway))]
pub async fn get_vehicle_info<G>(gateway: &G, id: &str) -> VehicleResult<VehicleInfo>
where
    G: UpstreamGateway + ?Sized,
{
    require_id(id)?;

    let data = gateway
        .fetch_vehicle_info(id)
        .await?
        .into_data(UpstreamOperation::VehicleInfo)?;

    let door_count = infer_door_count(&data.four_door_sedan, &data.two_door_coupe)
        .inspect_err(|e| debug!(error = %e, "Body style rejected"))?;
    debug!(door_count = u8::from(door_count), "Translated vehicle info");

    Ok(VehicleInfo {
        vin: data.vin.into_value(),
        color: data.color.into_value(),
        door_count,
        drive_train: data.drive_train.into_value(),
    })
}

/// Translate `getSecurityStatusService` into door states, preserving upstream order
#[instrument(level = "debug", skip(gateway))]
pub async fn get_security_status<G>(gateway: &G, id: &str) -> VehicleResult<Vec<DoorState>>
where
    G: UpstreamGateway + ?Sized,
{
    require_id(id)?;

    let data = gateway
        .fetch_security_status(id)
        .await?
        .into_data(UpstreamOperation::SecurityStatus)?;

    let doors: Vec<DoorState> = data
        .doors
        .values
        .into_iter()
        .map(|door| DoorState {
            locked: door.locked.as_lenient_bool(),
            location: door.location.into_value(),
        })
        .collect();

    debug!(count = doors.len(), "Translated door states");
    Ok(doors)
}

/// Translate `getEnergyService` into an [`EnergyLevel`] for `energy_type`.
///
/// Vehicle info and energy data are fetched concurrently; the first failure
/// wins and the other call is abandoned.
#[instrument(level = "debug", skip(gateway))]
pub async fn get_energy_data<G>(
    gateway: &G,
    id: &str,
    energy_type: &str,
) -> VehicleResult<EnergyLevel>
where
    G: UpstreamGateway + ?Sized,
{
    require_id(id)?;
    if energy_type.is_empty() {
        return Err(VehicleError::MissingEnergyType);
    }
    let requested = energy_type.parse::<EnergyType>().ok();

    let (vehicle, energy) = tokio::try_join!(
        gateway.fetch_vehicle_info(id),
        gateway.fetch_energy_data(id),
    )?;
    let vehicle = vehicle.into_data(UpstreamOperation::VehicleInfo)?;
    let energy = energy.into_data(UpstreamOperation::EnergyData)?;

    let drivetrain = Drivetrain::classify(&vehicle.drive_train.value);
    if let Some(requested) = requested {
        drivetrain
            .check_available(requested)
            .inspect_err(|e| debug!(?drivetrain, error = %e, "Energy type unavailable"))?;
    }

    let percent = match requested.ok_or(VehicleError::InvalidEnergyType)? {
        EnergyType::Fuel => energy.tank_level.as_percent(),
        EnergyType::Battery => energy.battery_level.as_percent(),
    };
    debug!(percent, "Translated energy level");

    Ok(EnergyLevel { percent })
}

/// Translate an engine action into `actionEngineService` and normalize the outcome.
///
/// An upstream `FAILED` is a successful translation carrying [`EngineStatus::Error`].
#[instrument(level = "debug", skip(gateway))]
pub async fn control_engine<G>(
    gateway: &G,
    id: &str,
    action: &str,
) -> VehicleResult<EngineActionResult>
where
    G: UpstreamGateway + ?Sized,
{
    require_id(id)?;
    let action: EngineAction = action.parse()?;

    let result = gateway
        .control_engine(id, action.command())
        .await?
        .into_data(UpstreamOperation::EngineControl)?;

    let status = match result.status {
        ActionStatus::Executed => EngineStatus::Success,
        other => {
            debug!(status = ?other, "Engine command not executed");
            EngineStatus::Error
        }
    };
    debug!(?status, "Translated engine action");

    Ok(EngineActionResult { status })
}
