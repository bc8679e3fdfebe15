// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("User not authenticated")]
    NotAuthenticated,
    /// Raw message reported by the backend (constraint violation, RLS denial, ...)
    #[error("{0}")]
    Backend(String),
    /// Raw message of the HTTP client when no response came back
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
