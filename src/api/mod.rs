//! API module
//!
//! HTTP endpoints, shared state and middleware.

pub mod middleware;
pub mod routes;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domain::PasswordHasher;
use crate::store::Store;
use crate::telemetry::{self, SharedTelemetry};

pub use routes::create_router;

/// State shared by every request.
///
/// The store handle is a pool; each handler opens its own unit of work from
/// it, so requests never share a mutable connection.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub hasher: PasswordHasher,
    pub telemetry: SharedTelemetry,
}

impl AppState {
    /// State with telemetry disabled and the default hasher
    pub fn new(store: Store) -> Self {
        Self {
            store,
            hasher: PasswordHasher::default(),
            telemetry: telemetry::noop(),
        }
    }

    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_telemetry(mut self, telemetry: SharedTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }
}

/// Build the application router with all layers attached
pub fn build_router(state: AppState) -> Router {
    // Axum layers run in reverse order of addition:
    // trace -> context -> logging -> handler
    create_router()
        .route("/health", get(routes::health_check))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::context_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
