use crate::{
    Cep, CurrentWeather, Locality, ResolverConfig,
    provider::{viacep::ViaCepProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, sync::Arc};

pub mod viacep;
pub mod weatherapi;

/// Resolves a CEP to the locality it belongs to.
#[async_trait]
pub trait LocalityProvider: Send + Sync + Debug {
    async fn locate(&self, cep: &Cep) -> anyhow::Result<Locality>;
}

/// Looks up current temperature for a locality name.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, locality: &str) -> anyhow::Result<CurrentWeather>;
}

/// Upstream providers built from resolver config, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct Providers {
    pub locality: Arc<dyn LocalityProvider>,
    pub weather: Arc<dyn WeatherProvider>,
}

/// Construct both providers from config. Fails when no weather key is configured.
pub fn providers_from_config(config: &ResolverConfig) -> anyhow::Result<Providers> {
    let api_key = config.weather_api_key()?.clone();
    let http = Client::new();

    Ok(Providers {
        locality: Arc::new(ViaCepProvider::with_client(
            config.locality_url.clone(),
            http.clone(),
        )),
        weather: Arc::new(WeatherApiProvider::with_client(
            api_key,
            config.weather_url.clone(),
            http,
        )),
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub(crate) fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
