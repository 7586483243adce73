//! Error handling for the Cozy Reads HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Body of every error response: `{"error": "<message>"}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A route's failure as seen by HTTP clients.
///
/// Callers only ever see the fixed message of the failed operation; the
/// underlying cause is logged.
#[derive(Error, Debug)]
pub enum AppError {
    /// A route's storage operation failed, for whatever reason.
    #[error("{message}")]
    Operation {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn operation(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Operation {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Message exposed to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Operation { message, .. } => *message,
        }
    }
}

/// Turn any failure into the fixed [`AppError::Operation`] of a route.
pub trait ResultExt<T> {
    fn or_fail(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_fail(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|source| AppError::operation(message, source))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status();
        let message = self.public_message();

        let cause = match &self {
            AppError::Operation { source, .. } => format!("{source:#}"),
        };

        tracing::error!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            cause = %cause,
            "{}",
            message
        );

        let body = ErrorBody {
            error: message.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn operation_error_renders_fixed_message() {
        let error = AppError::operation(
            "Failed to update book",
            anyhow::anyhow!("connection reset by peer"),
        );
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to update book"})
        );
    }

    #[test]
    fn or_fail_wraps_any_error() {
        let failed: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let error = failed.or_fail("Failed to fetch books").unwrap_err();

        assert_eq!(error.public_message(), "Failed to fetch books");
        assert_eq!(error.to_string(), "Failed to fetch books");
        let AppError::Operation { source, .. } = error;
        assert_eq!(source.to_string(), "boom");
    }
}
