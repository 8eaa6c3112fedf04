use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use songqueue_core::error::QueueError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl AppError {
    pub fn new(
        status: StatusCode,
        kind: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "kind": self.kind,
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        let kind = err.kind();
        match err {
            QueueError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, kind, msg)
            }
            QueueError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, kind, err.to_string())
            }
            QueueError::StoreUnavailable(detail) => {
                tracing::error!(error = %detail, "store operation failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind,
                    "Storage is temporarily unavailable",
                )
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_errors_map_to_status_codes() {
        let err = AppError::from(QueueError::validation("title must not be empty"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.kind, "validation_error");

        let err = AppError::from(QueueError::NotFound { id: 7 });
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Entry 7 not found");

        let err = AppError::from(QueueError::StoreUnavailable(
            "disk I/O error at /var/lib/songs.db".into(),
        ));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("/var/lib"), "store details stay in logs");
    }
}
