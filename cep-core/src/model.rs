use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Inbound gateway payload. A missing `cep` decodes as empty and later fails validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub cep: String,
}

/// Result of resolving a CEP to a locality.
#[derive(Debug, Clone, PartialEq)]
pub struct Locality {
    pub name: String,
    pub state: String,
    /// Set when the lookup service answered but does not know the CEP.
    pub not_found: bool,
}

/// Current temperature as reported by the weather service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentWeather {
    pub temp_c: f64,
    pub temp_f: f64,
}

/// Combined temperature report for a locality.
///
/// Serialized with the resolver's field names; decoding also accepts the
/// gateway's capitalisation so the gateway can read resolver bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(rename = "temp_c", alias = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_f", alias = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_k", alias = "temp_K")]
    pub temp_k: f64,
    #[serde(rename = "Cidade", alias = "cidade")]
    pub city: String,
}

impl WeatherReport {
    /// Build a report, deriving Kelvin from Celsius.
    pub fn new(city: impl Into<String>, weather: CurrentWeather) -> Self {
        Self {
            temp_c: weather.temp_c,
            temp_f: weather.temp_f,
            temp_k: celsius_to_kelvin(weather.temp_c),
            city: city.into(),
        }
    }
}

/// Unrounded Kelvin conversion.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}
