use opentelemetry::global;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub jaeger_endpoint: Option<String>,
    pub enable_jaeger: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "order-history".to_string(),
            log_level: "info".to_string(),
            jaeger_endpoint: None,
            enable_jaeger: false,
        }
    }
}

impl TelemetryConfig {
    /// Derive telemetry settings for a named service from app configuration
    pub fn for_service(service_name: &str, config: &AppConfig) -> Self {
        Self {
            service_name: service_name.to_string(),
            log_level: config.log_level.clone(),
            jaeger_endpoint: config.jaeger_endpoint.clone(),
            enable_jaeger: config.enable_jaeger,
        }
    }
}

/// Initialize tracing/logging with optional Jaeger export
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .json();

    if config.enable_jaeger {
        let tracer = opentelemetry_jaeger::new_agent_pipeline()
            .with_service_name(&config.service_name)
            .with_endpoint(config.jaeger_endpoint.unwrap_or_else(|| "localhost:6831".to_string()))
            .install_batch(opentelemetry_sdk::runtime::Tokio)?;

        let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(telemetry_layer)
            .try_init()?;

        tracing::info!(
            "Telemetry initialized with Jaeger tracing for service: {}",
            config.service_name
        );
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        tracing::info!("Telemetry initialized for service: {}", config.service_name);
    }

    Ok(())
}

/// Flush and shut down the tracer provider
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}
