//! Application state for the SmartCar API

use std::sync::Arc;

use smartcar_core::{UpstreamGateway, VehicleError};

use crate::error::{ApiError, StatusCodePolicy};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream vehicle API
    gateway: Arc<dyn UpstreamGateway>,
    /// How failures are rendered
    status_policy: StatusCodePolicy,
}

impl AppState {
    /// Create a new AppState rendering every failure as 500
    pub fn new(gateway: Arc<dyn UpstreamGateway>) -> Self {
        Self {
            gateway,
            status_policy: StatusCodePolicy::default(),
        }
    }

    /// Create a new AppState with an explicit status code policy
    pub fn with_status_policy(
        gateway: Arc<dyn UpstreamGateway>,
        status_policy: StatusCodePolicy,
    ) -> Self {
        Self {
            gateway,
            status_policy,
        }
    }

    /// Get the upstream gateway
    pub fn gateway(&self) -> &dyn UpstreamGateway {
        self.gateway.as_ref()
    }

    pub fn status_policy(&self) -> StatusCodePolicy {
        self.status_policy
    }

    /// Turn a translator failure into an API error under this state's policy
    pub fn reject(&self, err: VehicleError) -> ApiError {
        ApiError::from_vehicle_error(err, self.status_policy)
    }
}
