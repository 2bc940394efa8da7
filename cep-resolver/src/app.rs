use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use cep_core::propagation;
use tracing::Instrument;

use crate::service::WeatherService;

/// First `cep` value in the query string, if any. Never rejects the request.
fn cep_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "cep")
        .map(|(_, value)| value.into_owned())
}

pub fn router(service: WeatherService) -> Router {
    Router::new().route("/weather", get(weather)).with_state(service)
}

/// `GET /weather?cep=<8 digits>`
async fn weather(
    State(service): State<WeatherService>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let Some(cep) = cep_param(query.as_deref()).filter(|c| !c.is_empty()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let span = tracing::info_span!(
        "resolver.request",
        cep = %cep,
        trace_id = tracing::field::Empty,
    );
    propagation::set_parent_from_headers(&span, &headers);
    if let Some(trace_id) = propagation::trace_id(&headers) {
        span.record("trace_id", trace_id);
    }

    async move {
        match service.resolve(&cep).await {
            Ok(report) => {
                tracing::info!(city = %report.city, temp_c = report.temp_c, "resolved");
                Json(report).into_response()
            }
            Err(e) => e.into_response(),
        }
    }
    .instrument(span)
    .await
}
