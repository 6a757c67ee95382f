//! smartcar-core - Core types and translation rules for the SmartCar/GM adapter
//!
//! This crate holds everything that does not touch the network:
//! - the GM-shaped upstream payloads and the normalized SmartCar models
//! - the [`UpstreamGateway`] trait that upstream clients implement
//! - the four translator operations in [`translator`]
//!
//! # Usage
//!
//! ```ignore
//! use smartcar_core::translator;
//!
//! let gateway = gm_client::GmClient::new("http://gmapi.azurewebsites.net")?;
//! let info = translator::get_vehicle_info(&gateway, "1234").await?;
//! assert_eq!(u8::from(info.door_count), 4);
//! ```

pub mod error;
pub mod gateway;
pub mod models;
pub mod translator;

pub use error::{VehicleError, VehicleResult};
pub use gateway::{UpstreamGateway, UpstreamOperation};
pub use models::*;
