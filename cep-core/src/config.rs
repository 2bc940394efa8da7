use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, de::DeserializeOwned};
use std::{fmt, fs, path::Path};

pub const DEFAULT_GATEWAY_PORT: u16 = 8080;
pub const DEFAULT_RESOLVER_PORT: u16 = 8081;
pub const DEFAULT_RESOLVER_URL: &str = "http://localhost:8081";
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br";
pub const DEFAULT_WEATHERAPI_URL: &str = "http://api.weatherapi.com";
pub const DEFAULT_ZIPKIN_ENDPOINT: &str = "http://zipkin:9411/api/v2/spans";

/// Weather API credential. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}

/// Span export settings shared by both services.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    pub zipkin_endpoint: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zipkin_endpoint: DEFAULT_ZIPKIN_ENDPOINT.to_string(),
        }
    }
}

/// Gateway settings.
///
/// Example TOML:
/// ```toml
/// port = 8080
/// resolver_url = "http://resolver:8081"
///
/// [tracing]
/// zipkin_endpoint = "http://zipkin:9411/api/v2/spans"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub port: u16,
    pub resolver_url: String,
    pub tracing: TracingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_GATEWAY_PORT,
            resolver_url: DEFAULT_RESOLVER_URL.to_string(),
            tracing: TracingConfig::default(),
        }
    }
}

impl GatewayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        load_toml(path)
    }
}

/// Resolver settings. The weather key has exactly one source: this struct.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub port: u16,
    pub weather_api_key: Option<ApiKey>,
    pub locality_url: String,
    pub weather_url: String,
    pub tracing: TracingConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_RESOLVER_PORT,
            weather_api_key: None,
            locality_url: DEFAULT_VIACEP_URL.to_string(),
            weather_url: DEFAULT_WEATHERAPI_URL.to_string(),
            tracing: TracingConfig::default(),
        }
    }
}

impl ResolverConfig {
    pub fn load(path: &Path) -> Result<Self> {
        load_toml(path)
    }

    /// Returns the configured weather key, or an error explaining how to set one.
    pub fn weather_api_key(&self) -> Result<&ApiKey> {
        self.weather_api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No weather API key configured.\n\
                     Hint: set WEATHER_KEY, pass --weather-key, or add `weather_api_key` to the config file."
                )
            })
    }
}

fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
