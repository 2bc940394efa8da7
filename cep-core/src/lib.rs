//! Core library for the CEP weather services.
//!
//! This crate defines:
//! - CEP validation shared by the gateway and the resolver
//! - Configuration for both services
//! - Abstractions over the locality and weather upstreams
//! - Shared domain models (requests, reports)
//! - Logging, span export and trace-context propagation
//! - Listener and shutdown helpers for the HTTP servers
//!
//! It is used by `cep-gateway` and `cep-resolver`.

pub mod cep;
pub mod config;
pub mod model;
pub mod propagation;
pub mod provider;
pub mod server;
pub mod telemetry;

pub use cep::{Cep, CepError};
pub use config::{ApiKey, GatewayConfig, ResolverConfig, TracingConfig};
pub use model::{CurrentWeather, Locality, LookupRequest, WeatherReport, celsius_to_kelvin};
pub use provider::{LocalityProvider, Providers, WeatherProvider, providers_from_config};
