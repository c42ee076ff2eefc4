//! Error types for the webhook receiver.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use starkbank::WebhookError;
use starkbank::resource::UnknownResourceKind;
use starkbank_http::HttpError;

/// Errors that can occur while handling a webhook.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The path names no known resource.
    #[error("{0}")]
    UnknownResource(#[from] UnknownResourceKind),

    /// The `Digital-Signature` header is absent or unreadable.
    #[error("invalid signature: {0}")]
    SignatureHeader(#[from] HttpError),

    /// The body is not UTF-8.
    #[error("invalid content: body is not UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Verification or parsing failed.
    #[error(transparent)]
    Webhook(#[from] WebhookError),
}

impl ServiceError {
    /// HTTP status this error is answered with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownResource(_) => StatusCode::NOT_FOUND,
            Self::SignatureHeader(_) => StatusCode::UNAUTHORIZED,
            Self::Encoding(_) => StatusCode::BAD_REQUEST,
            Self::Webhook(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "webhook could not be processed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "webhook rejected");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starkbank::{FetchError, SignatureError};

    #[test]
    fn test_status_classification() {
        let unknown = ServiceError::from(UnknownResourceKind("boleto".into()));
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

        let header = ServiceError::from(HttpError::MissingHeader("Digital-Signature"));
        assert_eq!(header.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            header.to_string(),
            "invalid signature: missing `Digital-Signature` header"
        );

        let mismatch = ServiceError::from(WebhookError::from(SignatureError::Mismatch));
        assert_eq!(mismatch.status(), StatusCode::UNAUTHORIZED);

        let fetch = ServiceError::from(WebhookError::from(FetchError::Status {
            status: 502,
            body: String::new(),
        }));
        assert_eq!(fetch.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
