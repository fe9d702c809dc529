//! OTLP export of spans and counters

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use opentelemetry::metrics::{Counter, MeterProvider as _};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Tracer, TracerProvider};
use opentelemetry_sdk::Resource;

use super::Telemetry;

const INSTRUMENTATION_SCOPE: &str = "fintech.api";

static METER_PROVIDER: OnceLock<SdkMeterProvider> = OnceLock::new();

/// Counters backed by an OpenTelemetry meter
#[derive(Debug, Clone)]
pub struct OtelTelemetry {
    users_registered: Counter<u64>,
    transactions_created: Counter<u64>,
}

impl OtelTelemetry {
    fn new(provider: &SdkMeterProvider) -> Self {
        let meter = provider.meter(INSTRUMENTATION_SCOPE);

        Self {
            users_registered: meter
                .u64_counter("users_registered")
                .with_description("Number of users successfully registered")
                .build(),
            transactions_created: meter
                .u64_counter("transactions_created")
                .with_description("Number of transactions created")
                .build(),
        }
    }
}

impl Telemetry for OtelTelemetry {
    fn user_registered(&self) {
        self.users_registered.add(1, &[]);
    }

    fn transaction_created(&self, user_id: i64) {
        self.transactions_created
            .add(1, &[KeyValue::new("user_id", user_id.to_string())]);
    }
}

/// Build exporters and register the providers globally so they outlive setup
pub(super) fn install(endpoint: &str, service_name: &str) -> Result<(OtelTelemetry, Tracer)> {
    let resource = Resource::new(vec![KeyValue::new("service.name", service_name.to_string())]);

    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP span exporter: {}", e))?;

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(resource.clone())
        .build();
    let tracer = tracer_provider.tracer(INSTRUMENTATION_SCOPE);
    let _ = opentelemetry::global::set_tracer_provider(tracer_provider);

    let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP metric exporter: {}", e))?;

    let reader =
        PeriodicReader::builder(metric_exporter, opentelemetry_sdk::runtime::Tokio).build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource)
        .build();

    let telemetry = OtelTelemetry::new(&meter_provider);
    let _ = METER_PROVIDER.set(meter_provider.clone());
    opentelemetry::global::set_meter_provider(meter_provider);

    Ok((telemetry, tracer))
}

pub(super) fn shutdown() {
    if let Some(provider) = METER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "Metric export shutdown failed");
        }
    }
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::StoreConfig;
    use crate::domain::{OperationContext, PasswordHasher};
    use crate::handlers::{
        CreateTransactionCommand, CreateTransactionHandler, RegisterUserCommand,
        RegisterUserHandler,
    };
    use crate::store::Store;

    // Shutdown flushes through the Tokio runtime and blocks a current-thread one
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unreachable_collector_does_not_fail_operations() {
        let (telemetry, _tracer) = install("http://127.0.0.1:1", "fintech-api-test").unwrap();
        let telemetry: Arc<dyn Telemetry> = Arc::new(telemetry);

        let store = Store::connect(&StoreConfig::new("sqlite::memory:")).await.unwrap();
        let context = OperationContext::new();

        let registrar =
            RegisterUserHandler::new(store.clone(), PasswordHasher::Sha256, telemetry.clone());
        let user = registrar
            .execute(RegisterUserCommand::new("alice", "pw1"), &context)
            .await
            .unwrap();

        let created = CreateTransactionHandler::new(store.clone(), telemetry)
            .execute(CreateTransactionCommand::new(9.5, "tea", user.id), &context)
            .await;
        assert!(created.is_ok());

        shutdown();
    }
}
