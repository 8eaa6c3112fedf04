use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    /// Malformed or missing input. Always caller-fixable.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entry {id} not found")]
    NotFound { id: i64 },

    /// The storage layer could not complete the operation.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl QueueError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short machine-readable label used in error payloads and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QueueError::Validation(_) => "validation_error",
            QueueError::NotFound { .. } => "not_found",
            QueueError::StoreUnavailable(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for QueueError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for QueueError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StoreUnavailable(format!("migration failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, QueueError>;
