use std::sync::Arc;

use cep_core::{Cep, LocalityProvider, Providers, WeatherProvider, WeatherReport};

use crate::error::ResolveError;

/// Locality then weather, one after the other, for a single CEP.
#[derive(Debug, Clone)]
pub struct WeatherService {
    locality: Arc<dyn LocalityProvider>,
    weather: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(locality: Arc<dyn LocalityProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { locality, weather }
    }

    /// Validate `raw` strictly (8 digits, no separator) and resolve it.
    pub async fn resolve(&self, raw: &str) -> Result<WeatherReport, ResolveError> {
        let cep = Cep::parse_normalized(raw)?;

        let locality = self
            .locality
            .locate(&cep)
            .await
            .map_err(ResolveError::LocalityUnavailable)?;
        if locality.not_found {
            return Err(ResolveError::CepNotFound);
        }

        let weather = self
            .weather
            .current(&locality.name)
            .await
            .map_err(ResolveError::WeatherUnavailable)?;

        Ok(WeatherReport::new(locality.name, weather))
    }
}

impl From<Providers> for WeatherService {
    fn from(providers: Providers) -> Self {
        Self::new(providers.locality, providers.weather)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cep_core::{CurrentWeather, Locality};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockLocality {
        result: Result<Locality, &'static str>,
    }

    #[async_trait]
    impl LocalityProvider for MockLocality {
        async fn locate(&self, _cep: &Cep) -> anyhow::Result<Locality> {
            self.result.clone().map_err(anyhow::Error::msg)
        }
    }

    #[derive(Debug)]
    struct MockWeather {
        result: Result<CurrentWeather, &'static str>,
        queried: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WeatherProvider for MockWeather {
        async fn current(&self, locality: &str) -> anyhow::Result<CurrentWeather> {
            self.queried.lock().unwrap().push(locality.to_string());
            self.result.map_err(anyhow::Error::msg)
        }
    }

    fn found(name: &str) -> Result<Locality, &'static str> {
        Ok(Locality { name: name.to_string(), state: "SP".to_string(), not_found: false })
    }

    fn service(
        locality: Result<Locality, &'static str>,
        weather: Result<CurrentWeather, &'static str>,
    ) -> (WeatherService, Arc<MockWeather>) {
        let weather = Arc::new(MockWeather { result: weather, queried: Mutex::new(Vec::new()) });
        let svc = WeatherService::new(Arc::new(MockLocality { result: locality }), weather.clone());
        (svc, weather)
    }

    #[tokio::test]
    async fn resolves_report_with_derived_kelvin() {
        let (svc, weather) =
            service(found("São Paulo"), Ok(CurrentWeather { temp_c: 21.3, temp_f: 70.3 }));

        let report = svc.resolve("01310930").await.unwrap();

        assert_eq!(report.city, "São Paulo");
        assert_eq!(report.temp_c, 21.3);
        assert_eq!(report.temp_f, 70.3);
        assert_eq!(report.temp_k, 21.3 + 273.15);
        assert_eq!(*weather.queried.lock().unwrap(), vec!["São Paulo".to_string()]);
    }

    #[tokio::test]
    async fn hyphenated_code_is_invalid_here() {
        let (svc, _) = service(found("X"), Ok(CurrentWeather { temp_c: 0.0, temp_f: 32.0 }));
        let err = svc.resolve("01310-930").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidCep(_)));
    }

    #[tokio::test]
    async fn lookup_failure_skips_weather() {
        let (svc, weather) =
            service(Err("connection refused"), Ok(CurrentWeather { temp_c: 0.0, temp_f: 32.0 }));

        let err = svc.resolve("01310930").await.unwrap_err();
        assert!(matches!(err, ResolveError::LocalityUnavailable(_)));
        assert!(weather.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_cep_skips_weather() {
        let missing = Ok(Locality { name: String::new(), state: String::new(), not_found: true });
        let (svc, weather) = service(missing, Ok(CurrentWeather { temp_c: 0.0, temp_f: 32.0 }));

        let err = svc.resolve("99999999").await.unwrap_err();
        assert!(matches!(err, ResolveError::CepNotFound));
        assert!(weather.queried.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn weather_failure_yields_no_partial_report() {
        let (svc, _) = service(found("Recife"), Err("quota exceeded"));
        let err = svc.resolve("50030230").await.unwrap_err();
        assert!(matches!(err, ResolveError::WeatherUnavailable(_)));
    }
}
