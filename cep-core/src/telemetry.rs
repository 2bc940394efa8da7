//! Logging and distributed tracing setup.
//!
//! Installs a `tracing` subscriber (fmt output filtered by `RUST_LOG`) and,
//! when enabled, an OpenTelemetry layer exporting spans to Zipkin.

use opentelemetry::{KeyValue, global, trace::TracerProvider as _};
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::TracingConfig;

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build Zipkin exporter for {endpoint}: {reason}")]
    Exporter { endpoint: String, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the tracer provider alive; flushes pending spans on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "tracer provider shutdown failed");
            }
        }
    }
}

/// Install logging and, if configured, Zipkin span export for `service_name`.
///
/// Call this before starting the async runtime: the Zipkin exporter owns a
/// blocking HTTP client. An exporter that cannot be built is logged and the
/// service keeps running without span export.
pub fn init(service_name: &str, cfg: &TracingConfig) -> Result<TelemetryGuard, TelemetryError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let (provider, exporter_error) = if cfg.enabled {
        match build_provider(service_name, cfg) {
            Ok(provider) => (Some(provider), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer(service_name.to_string()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()?;

    match (&provider, exporter_error) {
        (Some(_), _) => {
            tracing::info!(service = service_name, endpoint = %cfg.zipkin_endpoint, "span export enabled");
        }
        (None, Some(e)) => {
            tracing::warn!(service = service_name, error = %e, "continuing without span export");
        }
        (None, None) => tracing::info!(service = service_name, "span export disabled"),
    }

    Ok(TelemetryGuard { provider })
}

fn build_provider(
    service_name: &str,
    cfg: &TracingConfig,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = opentelemetry_zipkin::ZipkinExporter::builder()
        .with_collector_endpoint(&cfg.zipkin_endpoint)
        .build()
        .map_err(|e| TelemetryError::Exporter {
            endpoint: cfg.zipkin_endpoint.clone(),
            reason: e.to_string(),
        })?;

    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name.to_string())])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    global::set_tracer_provider(provider.clone());
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_endpoint_is_reported_as_exporter_error() {
        let cfg = TracingConfig {
            enabled: true,
            zipkin_endpoint: "not a url".to_string(),
        };

        let err = build_provider("test-service", &cfg).unwrap_err();
        assert!(matches!(err, TelemetryError::Exporter { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    // Only caller of `init` in this test binary: it installs the global subscriber.
    #[test]
    fn init_survives_unbuildable_exporter() {
        let cfg = TracingConfig {
            enabled: true,
            zipkin_endpoint: "not a url".to_string(),
        };

        let guard = init("test-service", &cfg).expect("exporter failure must not be fatal");
        assert!(guard.provider.is_none());
    }

    #[test]
    fn guard_without_provider_drops_cleanly() {
        drop(TelemetryGuard { provider: None });
    }
}
