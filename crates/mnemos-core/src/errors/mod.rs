//! Error types. One enum per subsystem, wrapped by [`MnemosError`].

mod config_error;
mod external_error;
mod storage_error;

pub use config_error::ConfigError;
pub use external_error::ExternalServiceError;
pub use storage_error::StorageError;

/// Top-level error for every Mnemos operation.
#[derive(Debug, thiserror::Error)]
pub enum MnemosError {
    #[error("validation failed for {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("memory not found: {id}")]
    MemoryNotFound { id: String },

    #[error("conflict: {reason}")]
    ConflictError { reason: String },

    #[error("external service error: {0}")]
    ExternalServiceError(#[from] ExternalServiceError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),
}

impl MnemosError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::MemoryNotFound { id: id.into() }
    }

    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::ConflictError {
            reason: reason.into(),
        }
    }

    /// Whether a caller-level retry can succeed. Only lock contention qualifies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConflictError { .. })
    }

    /// Stable short name of the error kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "validation",
            Self::MemoryNotFound { .. } => "not_found",
            Self::ConflictError { .. } => "conflict",
            Self::ExternalServiceError(_) => "external_service",
            Self::StorageError(_) => "storage",
            Self::SerializationError(_) => "serialization",
            Self::ConfigError(_) => "config",
        }
    }
}

pub type MnemosResult<T> = Result<T, MnemosError>;
