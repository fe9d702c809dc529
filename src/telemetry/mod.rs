//! Telemetry module
//!
//! Counters around the mutating operations, injected into the handlers.
//! With no endpoint configured every hook is a no-op. Export problems are
//! logged and never reach a caller.
//!
//! Spans come from `tracing`: the handlers always open `register_user` and
//! `create_transaction` spans, and the OTLP layer installed by
//! [`init_tracing`] exports them when telemetry is enabled.

#[cfg(feature = "telemetry")]
mod otel;

use std::fmt;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;

#[cfg(feature = "telemetry")]
pub use otel::OtelTelemetry;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "fintech_api=debug,tower_http=debug";

/// Observability hooks called by the handlers after a successful commit
pub trait Telemetry: Send + Sync + fmt::Debug {
    /// A user was registered
    fn user_registered(&self);

    /// A transaction was created for `user_id`
    fn transaction_created(&self, user_id: i64);
}

/// Telemetry that records nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn user_registered(&self) {}

    fn transaction_created(&self, _user_id: i64) {}
}

/// Shared telemetry handle
pub type SharedTelemetry = Arc<dyn Telemetry>;

/// Handle that does nothing
pub fn noop() -> SharedTelemetry {
    Arc::new(NoopTelemetry)
}

/// Initialize tracing/logging, with OTLP span export when enabled.
///
/// Returns the telemetry handle to inject into the handlers. Never fails:
/// an exporter that cannot be built degrades to console logging.
pub fn init_tracing(config: &TelemetryConfig) -> SharedTelemetry {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    #[cfg(feature = "telemetry")]
    if let Some(endpoint) = config.endpoint.as_deref() {
        match otel::install(endpoint, &config.service_name) {
            Ok((telemetry, tracer)) => {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(tracing_subscriber::fmt::layer())
                    .with(tracing_opentelemetry::layer().with_tracer(tracer))
                    .init();
                tracing::info!(
                    endpoint = %endpoint,
                    service = %config.service_name,
                    "OpenTelemetry export enabled"
                );
                return Arc::new(telemetry);
            }
            Err(e) => {
                tracing_subscriber::registry()
                    .with(filter())
                    .with(tracing_subscriber::fmt::layer())
                    .init();
                tracing::warn!(error = %e, "Telemetry export disabled: exporter setup failed");
                return noop();
            }
        }
    }

    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.is_enabled() {
        tracing::warn!("TELEMETRY_ENDPOINT is set but this build lacks the `telemetry` feature");
    }

    noop()
}

/// Flush pending spans and metrics
#[cfg(feature = "telemetry")]
pub fn shutdown() {
    otel::shutdown();
}

/// No-op shutdown when telemetry is compiled out
#[cfg(not(feature = "telemetry"))]
pub fn shutdown() {}
