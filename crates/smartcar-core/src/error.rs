//! Error taxonomy shared by the gateway and the translator

use thiserror::Error;

use crate::gateway::UpstreamOperation;

/// Result type for gateway and translator operations
pub type VehicleResult<T> = Result<T, VehicleError>;

/// Errors that can occur while serving a normalized vehicle request
///
/// The `Display` text of each variant is the message rendered to clients.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VehicleError {
    /// Vehicle identifier was empty
    #[error("Vehicle ID is required")]
    MissingIdentifier,

    /// Energy type was empty
    #[error("Energy type is required")]
    MissingEnergyType,

    /// Energy type is neither `fuel` nor `battery`
    #[error("Invalid energy type")]
    InvalidEnergyType,

    /// Upstream reports the vehicle as both a sedan and a coupe
    #[error("Both vehicle types cannot be true")]
    InconsistentBodyStyle,

    /// Upstream reports neither body style
    #[error("Unknown vehicle type")]
    UnknownBodyStyle,

    /// Fuel level requested for a pure electric vehicle
    #[error("Fuel data is not available for electric vehicles")]
    FuelUnavailable,

    /// Battery level requested for a combustion-only vehicle
    #[error("Battery data is not available for non-electric vehicles")]
    BatteryUnavailable,

    /// Engine action token is not `START` or `STOP`
    #[error("Invalid action. Use 'START' or 'STOP'.")]
    InvalidAction,

    /// Upstream envelope carried a status other than "200"
    #[error("{}", .operation.failure_message())]
    UpstreamStatus {
        /// Which upstream service failed
        operation: UpstreamOperation,
        /// Status code string from the envelope, if any
        status: Option<String>,
        /// Free-text reason from the envelope, if any
        reason: Option<String>,
    },

    /// Upstream could not be reached or answered with a transport-level failure
    #[error("Upstream transport error: {message}")]
    Transport {
        /// Which upstream service was being called
        operation: UpstreamOperation,
        /// Description of the failure
        message: String,
        /// Whether the failure was a timeout
        timed_out: bool,
    },
}

impl VehicleError {
    /// Create an upstream-status error
    pub fn upstream_status(
        operation: UpstreamOperation,
        status: Option<String>,
        reason: Option<String>,
    ) -> Self {
        Self::UpstreamStatus {
            operation,
            status,
            reason,
        }
    }

    /// Create a transport error
    pub fn transport(operation: UpstreamOperation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a transport error caused by a timeout
    pub fn timeout(operation: UpstreamOperation, message: impl Into<String>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
            timed_out: true,
        }
    }

    /// Whether the failure originated upstream rather than in request validation
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            VehicleError::UpstreamStatus { .. } | VehicleError::Transport { .. }
        )
    }

    /// Returns the HTTP status code that classifies this error
    pub fn status_code(&self) -> u16 {
        match self {
            VehicleError::MissingIdentifier => 400,
            VehicleError::MissingEnergyType => 400,
            VehicleError::InvalidEnergyType => 400,
            VehicleError::InconsistentBodyStyle => 400,
            VehicleError::UnknownBodyStyle => 400,
            VehicleError::FuelUnavailable => 400,
            VehicleError::BatteryUnavailable => 400,
            VehicleError::InvalidAction => 400,
            VehicleError::UpstreamStatus { .. } => 502,
            VehicleError::Transport {
                timed_out: true, ..
            } => 504,
            VehicleError::Transport { .. } => 503,
        }
    }
}
