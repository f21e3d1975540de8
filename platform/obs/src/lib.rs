//! Tracing setup: env-filtered `fmt` output plus an optional OTLP span
//! exporter.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=info,sqlx=warn,sea_orm=warn";

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub ansi: bool,
}

impl ObsConfig {
    pub fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            ..Self::default()
        }
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "employee-server",
            env_filter: None,
            otlp_endpoint: None,
            ansi: std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

/// Install tracing subscribers with optional OTLP exporter. Later calls are
/// no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(config.resolved_filter())?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(config.ansi);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    let otlp_endpoint = config
        .otlp_endpoint
        .or_else(|| std::env::var("OTLP_ENDPOINT").ok());

    if let Some(endpoint) = otlp_endpoint {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name)
            .build();

        let provider = sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();
        let tracer = provider.tracer(config.service_name);

        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        registry.try_init()?;
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}
