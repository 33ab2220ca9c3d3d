use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kitstore_core::error::CoreError;

use crate::response::Envelope;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds transport, filesystem, and
/// database variants. Implements [`IntoResponse`] to produce the
/// `{ status: "fail", message }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `kitstore_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A filesystem error while storing or removing an upload.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// The request was not a readable multipart body at all.
    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status for this error.
    ///
    /// Validation problems are client errors; missing rows are 404; every
    /// other failure is reported as 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Core(CoreError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the envelope: the underlying error's own description.
    pub fn message(&self) -> String {
        match self {
            AppError::Core(CoreError::Validation(msg)) => msg.clone(),
            AppError::Core(CoreError::NotFound { entity, id }) => {
                format!("{entity} with id {id} not found")
            }
            AppError::MultipartRejection(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(%status, error = %message, "Request rejected");
        }

        (status, Json(Envelope::fail(message))).into_response()
    }
}
