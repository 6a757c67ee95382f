//! smartcar-gmd - SmartCar API daemon
//!
//! Serves the SmartCar-shaped vehicle API, answering every request by
//! calling the GM vehicle API.
//!
//! Usage:
//!   smartcar-gmd [OPTIONS]
//!
//! Settings come from CLI flags or environment variables, then from an
//! optional TOML config file, then from built-in defaults.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gm_client::GmClient;
use smartcar_api::{create_router, AppState};
use smartcar_core::UpstreamGateway;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{FileConfig, Overrides};

#[derive(Debug, Parser)]
#[command(name = "smartcar-gmd")]
#[command(author, version, about = "SmartCar API daemon backed by the GM vehicle API")]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "SMARTCAR_CONFIG")]
    config: Option<PathBuf>,

    /// Listen port [default: 3000]
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Bind address [default: 0.0.0.0]
    #[arg(long, env = "SMARTCAR_BIND")]
    bind: Option<String>,

    /// GM API base URL [default: http://gmapi.azurewebsites.net]
    #[arg(short = 'u', long, env = "GM_API_URL")]
    gm_api_url: Option<String>,

    /// Upstream request timeout in seconds [default: 30]
    #[arg(long, env = "GM_REQUEST_TIMEOUT")]
    request_timeout: Option<u64>,

    /// Error status codes: "uniform" (always 500) or "classified"
    #[arg(long, env = "SMARTCAR_STATUS_CODES")]
    status_codes: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port,
            bind: self.bind.clone(),
            gm_api_url: self.gm_api_url.clone(),
            request_timeout_secs: self.request_timeout,
            status_codes: self.status_codes.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "smartcar_gmd=info,smartcar_api=info,smartcar_core=info,gm_client=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting smartcar-gmd");

    if let Some(ref path) = cli.config {
        tracing::info!("Loading config from: {}", path.display());
    }
    let config = FileConfig::load(cli.config.as_deref())?.merge_with_args(&cli.overrides())?;

    let client = GmClient::with_config(
        &config.gm_api_url,
        config.request_timeout,
        config.connect_timeout,
    )
    .with_context(|| format!("Invalid GM API URL: {}", config.gm_api_url))?;
    tracing::info!(
        gm_api_url = %client.base_url(),
        timeout_secs = config.request_timeout.as_secs(),
        status_codes = ?config.status_policy,
        "Upstream configured"
    );

    let gateway: Arc<dyn UpstreamGateway> = Arc::new(client);
    let state = AppState::with_status_policy(gateway, config.status_policy);

    // Create the router
    let app = create_router(state);

    // Bind to address
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    // Run the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use smartcar_api::StatusCodePolicy;

    use super::*;

    const ENV_VARS: [&str; 6] = [
        "SMARTCAR_CONFIG",
        "PORT",
        "SMARTCAR_BIND",
        "GM_API_URL",
        "GM_REQUEST_TIMEOUT",
        "SMARTCAR_STATUS_CODES",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_flags() {
        clear_env();
        let cli = Cli::try_parse_from([
            "smartcar-gmd",
            "-p",
            "8081",
            "-u",
            "http://localhost:9000",
            "--status-codes",
            "classified",
        ])
        .unwrap();

        let config = FileConfig::default()
            .merge_with_args(&cli.overrides())
            .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.gm_api_url, "http://localhost:9000");
        assert_eq!(config.status_policy, StatusCodePolicy::Classified);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nrequest_timeout_secs = 5").unwrap();

        std::env::set_var("SMARTCAR_CONFIG", file.path());
        std::env::set_var("PORT", "9090");
        let cli = Cli::try_parse_from(["smartcar-gmd"]).unwrap();
        clear_env();

        let config = FileConfig::load(cli.config.as_deref())
            .unwrap()
            .merge_with_args(&cli.overrides())
            .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.request_timeout.as_secs(), 5);
    }

    #[test]
    #[serial]
    fn test_flag_overrides_env() {
        clear_env();
        std::env::set_var("GM_API_URL", "http://from-env");
        let cli = Cli::try_parse_from(["smartcar-gmd", "--gm-api-url", "http://from-flag"]).unwrap();
        clear_env();

        assert_eq!(cli.gm_api_url.as_deref(), Some("http://from-flag"));
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        clear_env();
        assert!(Cli::try_parse_from(["smartcar-gmd", "--port", "70000"]).is_err());
    }
}
