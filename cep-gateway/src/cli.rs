use anyhow::Context;
use cep_core::{GatewayConfig, server, telemetry};
use clap::Parser;
use std::path::PathBuf;

use crate::{app, client::ResolverClient};

const SERVICE_NAME: &str = "cep-gateway";

/// Top-level CLI struct. Flags and environment variables override the config file.
#[derive(Debug, Parser)]
#[command(name = "cep-gateway", version, about = "Validate CEP lookups and relay them to the resolver")]
pub struct Cli {
    /// Optional TOML config file.
    #[arg(long, env = "GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on (default 8080).
    #[arg(long)]
    pub port: Option<u16>,

    /// Base URL of the resolver service, e.g. "http://resolver:8081".
    #[arg(long, env = "RESOLVER_URL")]
    pub resolver_url: Option<String>,

    /// Zipkin span collector endpoint.
    #[arg(long, env = "ZIPKIN_ENDPOINT")]
    pub zipkin_endpoint: Option<String>,

    /// Do not export spans.
    #[arg(long, env = "TRACING_DISABLED")]
    pub no_tracing: bool,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::load(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.resolver_url {
            config.resolver_url = url;
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

async fn serve(config: GatewayConfig) -> anyhow::Result<()> {
    let client = ResolverClient::new(config.resolver_url.clone());
    let listener = server::bind(config.port).await?;
    tracing::info!(port = config.port, resolver = %config.resolver_url, "gateway listening");

    axum::serve(listener, app::router(client))
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("Gateway server failed")
}
