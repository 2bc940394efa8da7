use anyhow::Context;
use cep_core::{ApiKey, ResolverConfig, providers_from_config, server, telemetry};
use clap::Parser;
use std::path::PathBuf;

use crate::{app, service::WeatherService};

const SERVICE_NAME: &str = "cep-resolver";

/// Top-level CLI struct. Flags and environment variables override the config file.
#[derive(Debug, Parser)]
#[command(name = "cep-resolver", version, about = "Resolve a CEP to its current temperature")]
pub struct Cli {
    /// Optional TOML config file.
    #[arg(long, env = "RESOLVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on (default 8081).
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// WeatherAPI.com key.
    #[arg(long, env = "WEATHER_KEY", hide_env_values = true)]
    pub weather_key: Option<String>,

    /// Base URL of the ViaCEP locality service.
    #[arg(long, env = "VIACEP_URL")]
    pub viacep_url: Option<String>,

    /// Base URL of the WeatherAPI.com service.
    #[arg(long, env = "WEATHERAPI_URL")]
    pub weatherapi_url: Option<String>,

    /// Zipkin span collector endpoint.
    #[arg(long, env = "ZIPKIN_ENDPOINT")]
    pub zipkin_endpoint: Option<String>,

    /// Do not export spans.
    #[arg(long, env = "TRACING_DISABLED")]
    pub no_tracing: bool,
}

impl Cli {
    /// Effective configuration: file (or defaults), then flags and environment.
    pub fn into_config(self) -> anyhow::Result<ResolverConfig> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::load(path)?,
            None => ResolverConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(key) = self.weather_key {
            config.weather_api_key = Some(ApiKey::new(key));
        }
        if let Some(url) = self.viacep_url {
            config.locality_url = url;
        }
        if let Some(url) = self.weatherapi_url {
            config.weather_url = url;
        }
        if let Some(endpoint) = self.zipkin_endpoint {
            config.tracing.zipkin_endpoint = endpoint;
        }
        if self.no_tracing {
            config.tracing.enabled = false;
        }

        Ok(config)
    }

    pub fn run(self) -> anyhow::Result<()> {
        let config = self.into_config()?;
        let _telemetry = telemetry::init(SERVICE_NAME, &config.tracing)?;

        // Sync entry point: the Zipkin exporter's blocking client must be built outside tokio.
        server::runtime()?.block_on(serve(config))
    }
}

async fn serve(config: ResolverConfig) -> anyhow::Result<()> {
    let service = WeatherService::from(providers_from_config(&config)?);
    let listener = server::bind(config.port).await?;
    tracing::info!(port = config.port, "resolver listening");

    axum::serve(listener, app::router(service))
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("Resolver server failed")
}
