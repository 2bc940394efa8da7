use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use cep_core::{Cep, LookupRequest, WeatherReport};
use serde::Serialize;

use crate::{client::ResolverClient, error::GatewayError};

/// Report as returned to gateway clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientReport {
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
    #[serde(rename = "cidade")]
    pub city: String,
}

impl From<WeatherReport> for ClientReport {
    fn from(report: WeatherReport) -> Self {
        Self {
            temp_c: report.temp_c,
            temp_f: report.temp_f,
            temp_k: report.temp_k,
            city: report.city,
        }
    }
}

pub fn router(client: ResolverClient) -> Router {
    Router::new().route("/", post(lookup)).with_state(client)
}

/// `POST /` with `{"cep": "..."}`.
async fn lookup(
    State(client): State<ResolverClient>,
    body: Bytes,
) -> Result<Json<ClientReport>, GatewayError> {
    // A JSON `null` body is a lookup with no CEP, not a malformed one.
    let request: LookupRequest = serde_json::from_slice::<Option<LookupRequest>>(&body)
        .map_err(GatewayError::MalformedBody)?
        .unwrap_or_default();
    let cep = Cep::parse(&request.cep).map_err(|_| GatewayError::InvalidZipcode)?;

    let report = client.weather(&cep).await?;
    tracing::info!(%cep, city = %report.city, "lookup served");

    Ok(Json(report.into()))
}
