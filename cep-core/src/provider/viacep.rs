use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::Instrument;

use crate::{
    cep::Cep,
    model::Locality,
    provider::{trim_base, truncate_body},
};

use super::LocalityProvider;

/// Locality lookup against ViaCEP (`GET {base}/ws/{cep}/json/`). No credentials.
#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    base_url: String,
    http: Client,
}

impl ViaCepProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }

    fn lookup_url(&self, cep: &Cep) -> String {
        format!("{}/ws/{}/json/", trim_base(&self.base_url), cep)
    }

    async fn fetch(&self, cep: &Cep) -> Result<Locality> {
        let url = self.lookup_url(cep);
        tracing::debug!(%url, "requesting locality");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to ViaCEP")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read ViaCEP response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "ViaCEP request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: VcResponse =
            serde_json::from_str(&body).context("Failed to parse ViaCEP JSON")?;

        Ok(Locality {
            not_found: parsed.erro.as_ref().is_some_and(VcErro::is_set),
            name: parsed.localidade,
            state: parsed.uf,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VcResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<VcErro>,
}

/// ViaCEP has reported the flag both as a JSON bool and as the string `"true"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VcErro {
    Flag(bool),
    Text(String),
}

impl VcErro {
    fn is_set(&self) -> bool {
        match self {
            VcErro::Flag(flag) => *flag,
            VcErro::Text(text) => text.eq_ignore_ascii_case("true"),
        }
    }
}

#[async_trait]
impl LocalityProvider for ViaCepProvider {
    async fn locate(&self, cep: &Cep) -> Result<Locality> {
        let span = tracing::info_span!("resolver.locality_lookup", cep = %cep);
        self.fetch(cep).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cep() -> Cep {
        Cep::parse("01310-930").unwrap()
    }

    #[tokio::test]
    async fn locate_returns_locality() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01310930/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01310-930",
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .mount(&server)
            .await;

        let provider = ViaCepProvider::new(server.uri());
        let locality = provider.locate(&cep()).await.unwrap();

        assert_eq!(locality.name, "São Paulo");
        assert_eq!(locality.state, "SP");
        assert!(!locality.not_found);
    }

    #[tokio::test]
    async fn erro_flag_marks_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": true })),
            )
            .mount(&server)
            .await;

        let locality = ViaCepProvider::new(server.uri()).locate(&cep()).await.unwrap();
        assert!(locality.not_found);
        assert!(locality.name.is_empty());
    }

    #[tokio::test]
    async fn erro_flag_as_string_marks_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": "true" })),
            )
            .mount(&server)
            .await;

        let locality = ViaCepProvider::new(server.uri()).locate(&cep()).await.unwrap();
        assert!(locality.not_found);
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&server)
            .await;

        let err = ViaCepProvider::new(server.uri()).locate(&cep()).await.unwrap_err();
        assert!(err.to_string().contains("400"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01310930/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .mount(&server)
            .await;

        let provider = ViaCepProvider::new(format!("{}/", server.uri()));
        assert!(provider.locate(&cep()).await.is_ok());
    }
}
