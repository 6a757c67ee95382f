//! Configuration file handling for smartcar-gmd

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use gm_client::{DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use smartcar_api::StatusCodePolicy;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration as read from a TOML file
///
/// Every key is optional; anything left out falls back to the CLI, the
/// environment, or the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Listen port
    pub port: Option<u16>,
    /// Bind address
    pub bind: Option<String>,
    /// GM API base URL
    pub gm_api_url: Option<String>,
    /// Upstream request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Upstream connect timeout in seconds
    pub connect_timeout_secs: Option<u64>,
    /// "uniform" or "classified"
    pub status_codes: Option<String>,
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub gm_api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub status_codes: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub port: u16,
    pub bind: IpAddr,
    pub gm_api_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub status_policy: StatusCodePolicy,
}

impl ResolvedConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

impl FileConfig {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the config file if one was given, otherwise use an empty config
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Merge CLI/env overrides over file values, then fill in defaults
    pub fn merge_with_args(&self, args: &Overrides) -> Result<ResolvedConfig> {
        let bind = match args.bind.as_deref().or(self.bind.as_deref()) {
            Some(bind) => bind
                .parse()
                .with_context(|| format!("Invalid bind address: {}", bind))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let status_policy = match args
            .status_codes
            .as_deref()
            .or(self.status_codes.as_deref())
        {
            Some(policy) => policy.parse().map_err(|e: String| anyhow!(e))?,
            None => StatusCodePolicy::default(),
        };

        let request_timeout = args
            .request_timeout_secs
            .or(self.request_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = self
            .connect_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        if request_timeout.is_zero() || connect_timeout.is_zero() {
            return Err(anyhow!("Upstream timeouts must be at least one second"));
        }

        Ok(ResolvedConfig {
            port: args.port.or(self.port).unwrap_or(DEFAULT_PORT),
            bind,
            gm_api_url: args
                .gm_api_url
                .clone()
                .or_else(|| self.gm_api_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
            connect_timeout,
            status_policy,
        })
    }
}
