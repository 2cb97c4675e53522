//! Logging and optional OpenTelemetry tracing initialization.
//!
//! Log output goes through `tracing-subscriber` with an `EnvFilter`
//! (`RUST_LOG` wins over the configured level). With the `telemetry` feature
//! spans can additionally be exported over OTLP.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "logging")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::PantryResult;
use serde::{Deserialize, Serialize};

/// Filter used when neither `RUST_LOG` nor a configured level is available.
pub const DEFAULT_FILTER: &str = "info,pantry=debug,tower_http=debug";

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive, e.g. `info` or `info,pantry=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Whether spans are exported over OTLP.
    #[serde(default)]
    pub otlp_enabled: bool,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_log_level() -> String {
    DEFAULT_FILTER.to_string()
}

fn default_service_name() -> String {
    "pantry-catalog".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            otlp_enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(feature = "logging")]
fn env_filter(config: &TelemetryConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(feature = "logging")]
fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Text => tracing_subscriber::fmt::layer().with_target(true).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .boxed(),
    }
}

/// Initializes the global subscriber with console logging only.
#[cfg(feature = "logging")]
pub fn init_logging(config: &TelemetryConfig) -> PantryResult<()> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer(config.log_format))
        .try_init()
        .map_err(|e| crate::PantryError::Internal(format!("Failed to init logging: {e}")))
}

/// Initializes logging, plus OTLP span export when enabled.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> PantryResult<()> {
    if !config.otlp_enabled {
        return init_logging(config);
    }

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(
        SERVICE_NAME,
        config.service_name.clone(),
    )]);

    let mut builder = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| {
                crate::PantryError::Internal(format!("Failed to create OTLP exporter: {e}"))
            })?;
        builder = builder.with_batch_exporter(exporter, runtime::Tokio);
    }

    let tracer_provider = builder.build();
    let tracer = tracer_provider.tracer("pantry-catalog");
    opentelemetry::global::set_tracer_provider(tracer_provider);

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(fmt_layer(config.log_format))
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| crate::PantryError::Internal(format!("Failed to init telemetry: {e}")))?;

    tracing::info!(
        service_name = %config.service_name,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(())
}

/// Without OTLP support this is plain logging.
#[cfg(all(feature = "logging", not(feature = "telemetry")))]
pub fn init_telemetry(config: &TelemetryConfig) -> PantryResult<()> {
    init_logging(config)
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert!(!config.otlp_enabled);
        assert_eq!(config.service_name, "pantry-catalog");
        assert_eq!(config.log_level, DEFAULT_FILTER);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_log_format_deserializes_lowercase() {
        let config: TelemetryConfig =
            serde_json::from_str(r#"{"log_level":"warn","log_format":"json"}"#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "warn");
        assert!((config.sampling_ratio - 1.0).abs() < f64::EPSILON);
    }
}
