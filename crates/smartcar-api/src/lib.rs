//! smartcar-api - SmartCar-shaped REST API layer
//!
//! This crate provides the HTTP surface that serves normalized vehicle
//! endpoints by running the translator against an [`UpstreamGateway`].
//! It is gateway-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use smartcar_api::{create_router, AppState};
//! use gm_client::GmClient;
//!
//! let gateway = GmClient::new("http://gmapi.azurewebsites.net")?;
//! let state = AppState::new(Arc::new(gateway));
//! let router = create_router(state);
//! ```
//!
//! [`UpstreamGateway`]: smartcar_core::UpstreamGateway

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, StatusCodePolicy};
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Prefix under which the versioned routes are mounted
pub const API_PREFIX: &str = "/api";

/// Create the versioned vehicle routes (without the `/api` prefix)
pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/vehicles/{id}",
            get(handlers::vehicles::get_vehicle_info),
        )
        .route(
            "/v1/vehicles/{id}/doors",
            get(handlers::vehicles::get_security_status),
        )
        .route(
            "/v1/vehicles/{id}/engine",
            post(handlers::vehicles::control_engine),
        )
        // Energy routes: {energy_type} is "fuel" or "battery"
        .route(
            "/v1/vehicles/{id}/{energy_type}",
            get(handlers::vehicles::get_energy_level),
        )
}

/// Create the SmartCar REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .nest(API_PREFIX, vehicle_routes())
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
