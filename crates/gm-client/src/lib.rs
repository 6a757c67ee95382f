//! GM vehicle API client
//!
//! Provides [`GmClient`], a typed HTTP client for the GM-shaped upstream
//! vehicle API. It implements [`smartcar_core::UpstreamGateway`], so it can be
//! handed directly to the translator operations.
//!
//! # Example
//!
//! ```rust,no_run
//! use gm_client::GmClient;
//! use smartcar_core::translator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GmClient::new(gm_client::DEFAULT_BASE_URL)?;
//!
//!     let doors = translator::get_security_status(&client, "1234").await?;
//!     for door in doors {
//!         println!("{}: locked={}", door.location, door.locked);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides a mock GM API served in-process:
//!
//! ```rust,ignore
//! use gm_client::testing::MockGmServer;
//!
//! let gm = MockGmServer::start().await?;
//! let client = gm.client()?;
//! let info = translator::get_vehicle_info(&client, "1234").await?;
//! ```

mod client;
mod error;
pub mod testing;

pub use client::{GmClient, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use error::{GmClientError, Result};
