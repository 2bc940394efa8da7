use cep_core::{Cep, WeatherReport, propagation};
use reqwest::{Client, StatusCode, header::HeaderMap};
use tracing::Instrument;

use crate::error::GatewayError;

/// HTTP client for the resolver's `GET /weather?cep=` endpoint.
#[derive(Debug, Clone)]
pub struct ResolverClient {
    base_url: String,
    http: Client,
}

impl ResolverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    /// One resolver round-trip inside the `gateway.request_resolver` span.
    pub async fn weather(&self, cep: &Cep) -> Result<WeatherReport, GatewayError> {
        let span = tracing::info_span!(
            "gateway.request_resolver",
            cep = %cep,
            status = tracing::field::Empty,
        );
        self.fetch(cep).instrument(span).await
    }

    async fn fetch(&self, cep: &Cep) -> Result<WeatherReport, GatewayError> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        propagation::inject_current_span(&mut headers);

        let res = self
            .http
            .get(&url)
            .query(&[("cep", cep.as_str())])
            .headers(headers)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = res.status();
        tracing::Span::current().record("status", status.as_u16());

        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }

        let body = res.bytes().await.map_err(GatewayError::Transport)?;

        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status,
                message: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        serde_json::from_slice(&body).map_err(GatewayError::UndecodableReport)
    }
}
