use thiserror::Error;

/// Failure raised by a durable key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage write rejected for key '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    #[cfg(feature = "ssr")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors surfaced to the view layer and the HTTP API.
///
/// The `Display` strings double as the user-facing messages shown next to forms.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("You must be logged in to do that")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Stored collection '{key}' is corrupt: {source}")]
    CorruptCollection {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Whether the error comes from bad user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::NotAuthenticated | AppError::Validation(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
