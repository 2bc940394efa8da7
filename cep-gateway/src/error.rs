use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Every way a gateway lookup can end short of a report. `Display` is the response body.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request body is not valid JSON; carries the parser's message.
    #[error("{0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("invalid zipcode")]
    InvalidZipcode,

    #[error("can not find zipcode")]
    NotFound,

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    /// Resolver answered with an error status other than 404.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    UndecodableReport(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidZipcode => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Upstream { status, .. } => *status,
            GatewayError::Transport(_) | GatewayError::UndecodableReport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "resolver call failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "lookup rejected");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages_and_statuses() {
        assert_eq!(GatewayError::InvalidZipcode.to_string(), "invalid zipcode");
        assert_eq!(GatewayError::InvalidZipcode.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(GatewayError::NotFound.to_string(), "can not find zipcode");
        assert_eq!(GatewayError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_body_carries_parser_text() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = parse_err.to_string();

        let err = GatewayError::MalformedBody(parse_err);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn upstream_status_is_propagated() {
        let err = GatewayError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: "down".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "down");
    }
}
