//! psacc-api - REST surface for the PSA Car Controller bridge
//!
//! Exposes the coordinator cache, the per-vehicle entities and the command
//! services over HTTP. The router is backend-agnostic: it only needs an
//! [`AppState`] built from a client and the coordinator that polls it.
//!
//! # Usage
//!
//! ```ignore
//! use psacc_api::{create_router, AppState};
//!
//! let state = AppState::new(client, coordinator);
//! let router = create_router(state);
//! ```

mod coerce;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Cached vehicle data
        .route("/api/vehicles", get(handlers::vehicles::list_vehicles))
        .route("/api/vehicles/{vin}", get(handlers::vehicles::get_vehicle))
        // Entities
        .route(
            "/api/vehicles/{vin}/entities",
            get(handlers::entities::list_entities),
        )
        .route(
            "/api/vehicles/{vin}/switches/{switch}/{action}",
            post(handlers::entities::switch_action),
        )
        .route(
            "/api/vehicles/{vin}/buttons/{button}/press",
            post(handlers::entities::press_button),
        )
        .route(
            "/api/vehicles/{vin}/numbers/{number}",
            put(handlers::entities::set_number),
        )
        .route(
            "/api/vehicles/{vin}/selects/{select}",
            put(handlers::entities::select_option),
        )
        // Command services
        .route("/api/services", get(handlers::services::list_services))
        .route(
            "/api/services/{service}",
            post(handlers::services::call_service),
        )
        // Coordinator
        .route("/api/refresh", post(handlers::system::refresh))
        .route("/api/status", get(handlers::system::status))
        .route("/api/options", put(handlers::system::update_options))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
