use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cep_core::CepError;

/// Terminal outcomes of a resolve request. `Display` is the client-facing body.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("CEP inválido")]
    InvalidCep(#[from] CepError),

    #[error("Erro ao buscar localização")]
    LocalityUnavailable(#[source] anyhow::Error),

    #[error("CEP Nao encontrado!")]
    CepNotFound,

    #[error("Erro ao buscar clima atuall")]
    WeatherUnavailable(#[source] anyhow::Error),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::InvalidCep(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ResolveError::LocalityUnavailable(_) | ResolveError::CepNotFound => {
                StatusCode::NOT_FOUND
            }
            ResolveError::WeatherUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        match &self {
            ResolveError::LocalityUnavailable(cause) | ResolveError::WeatherUnavailable(cause) => {
                let detail = format!("{cause:#}");
                tracing::warn!(error = %detail, "{self}");
            }
            ResolveError::InvalidCep(cause) => tracing::debug!(error = %cause, "{self}"),
            ResolveError::CepNotFound => tracing::info!("{self}"),
        }

        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_and_messages() {
        let cases = [
            (
                ResolveError::InvalidCep(CepError::Invalid("1".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
                "CEP inválido",
            ),
            (
                ResolveError::LocalityUnavailable(anyhow::anyhow!("boom")),
                StatusCode::NOT_FOUND,
                "Erro ao buscar localização",
            ),
            (ResolveError::CepNotFound, StatusCode::NOT_FOUND, "CEP Nao encontrado!"),
            (
                ResolveError::WeatherUnavailable(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao buscar clima atuall",
            ),
        ];

        for (err, status, message) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn locality_failures_share_not_found_status() {
        assert_eq!(
            ResolveError::LocalityUnavailable(anyhow::anyhow!("down")).status(),
            ResolveError::CepNotFound.status()
        );
    }
}
