//! GM HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use smartcar_core::{
    ActionResult, EngineCommand, EnergyData, Envelope, SecurityData, UpstreamGateway,
    UpstreamOperation, VehicleError, VehicleInfoData, VehicleResult,
};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{GmClientError, Result};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://gmapi.azurewebsites.net";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Body sent to every GM service
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRequest<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    command: Option<EngineCommand>,
    response_type: &'static str,
}

impl<'a> ServiceRequest<'a> {
    fn new(id: &'a str) -> Self {
        Self {
            id,
            command: None,
            response_type: "JSON",
        }
    }

    fn with_command(mut self, command: EngineCommand) -> Self {
        self.command = Some(command);
        self
    }
}

/// GM vehicle API client
///
/// Issues `POST {base}/{service}` calls and checks the envelope status of
/// every response. Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GmClient {
    client: Client,
    base_url: Url,
}

impl GmClient {
    /// Create a new GM client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the GM API (e.g., "http://gmapi.azurewebsites.net")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new GM client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(GmClientError::UnsupportedBaseUrl(base_url.to_string()));
        }
        // Service names are appended to whatever path prefix the base carries
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL of an upstream service
    pub fn service_url(&self, operation: UpstreamOperation) -> Result<Url> {
        Ok(self.base_url.join(operation.service())?)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: UpstreamOperation,
        body: &ServiceRequest<'_>,
    ) -> VehicleResult<Envelope<T>> {
        let url = self
            .service_url(operation)
            .map_err(|e| VehicleError::transport(operation, e.to_string()))?;
        debug!(%url, "Calling GM service");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(service = %operation, http_status = %status, "GM service returned HTTP error");
            return Err(VehicleError::transport(
                operation,
                format!("HTTP {}", status),
            ));
        }

        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            if e.is_timeout() {
                transport_error(operation, e)
            } else {
                VehicleError::transport(operation, format!("Failed to parse response: {}", e))
            }
        })?;

        if !envelope.is_success() {
            warn!(
                service = %operation,
                status = envelope.status.as_deref().unwrap_or("<missing>"),
                reason = envelope.reason.as_deref().unwrap_or(""),
                "GM service reported failure"
            );
        }
        envelope.ensure_success(operation)
    }
}

fn transport_error(operation: UpstreamOperation, err: reqwest::Error) -> VehicleError {
    if err.is_timeout() {
        VehicleError::timeout(operation, "request timed out")
    } else {
        VehicleError::transport(operation, err.to_string())
    }
}

#[async_trait]
impl UpstreamGateway for GmClient {
    #[instrument(skip(self))]
    async fn fetch_vehicle_info(&self, id: &str) -> VehicleResult<Envelope<VehicleInfoData>> {
        self.call(UpstreamOperation::VehicleInfo, &ServiceRequest::new(id))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_security_status(&self, id: &str) -> VehicleResult<Envelope<SecurityData>> {
        self.call(UpstreamOperation::SecurityStatus, &ServiceRequest::new(id))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_energy_data(&self, id: &str) -> VehicleResult<Envelope<EnergyData>> {
        self.call(UpstreamOperation::EnergyData, &ServiceRequest::new(id))
            .await
    }

    #[instrument(skip(self))]
    async fn control_engine(
        &self,
        id: &str,
        command: EngineCommand,
    ) -> VehicleResult<Envelope<ActionResult>> {
        self.call(
            UpstreamOperation::EngineControl,
            &ServiceRequest::new(id).with_command(command),
        )
        .await
    }
}
