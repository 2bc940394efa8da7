use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::Instrument;

use crate::{
    config::ApiKey,
    model::CurrentWeather,
    provider::{trim_base, truncate_body},
};

use super::WeatherProvider;

/// Current conditions from WeatherAPI.com, keyed by locality name.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: ApiKey,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: ApiKey, base_url: impl Into<String>) -> Self {
        Self::with_client(api_key, base_url, Client::new())
    }

    pub fn with_client(api_key: ApiKey, base_url: impl Into<String>, http: Client) -> Self {
        Self { api_key, base_url: base_url.into(), http }
    }

    async fn fetch_current(&self, locality: &str) -> Result<CurrentWeather> {
        let url = format!("{}/v1/current.json", trim_base(&self.base_url));
        tracing::debug!(%url, q = locality, key = "[redacted]", "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.expose()), ("q", locality)])
            .send()
            .await
            // The request URL carries the key.
            .map_err(reqwest::Error::without_url)
            .context("Failed to send request to WeatherAPI.com (current)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read WeatherAPI current response body")?;

        if !status.is_success() {
            let detail = serde_json::from_str::<WaResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or_else(|| truncate_body(&body));

            return Err(anyhow::anyhow!(
                "WeatherAPI current request failed with status {}: {}",
                status,
                detail,
            ));
        }

        let parsed: WaResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI current JSON")?;

        let current = parsed
            .current
            .ok_or_else(|| anyhow::anyhow!("WeatherAPI response contained no current data"))?;

        Ok(CurrentWeather { temp_c: current.temp_c, temp_f: current.temp_f })
    }
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
}

#[derive(Debug, Deserialize)]
struct WaError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    current: Option<WaCurrent>,
    error: Option<WaError>,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, locality: &str) -> Result<CurrentWeather> {
        let span = tracing::info_span!("resolver.weather_lookup", locality);
        self.fetch_current(locality).instrument(span).await
    }
}
