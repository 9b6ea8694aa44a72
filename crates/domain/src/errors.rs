use crate::entities::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("user with nickname {nickname} not found!")]
    NotFound { nickname: String },

    #[error("user with nick name {nickname} already exist!")]
    Conflict { nickname: String },

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Notify(String),

    #[error("{0}")]
    Decode(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),
}

impl DomainError {
    /// True for failures caused by the caller's input rather than by a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::NotFound { .. } | DomainError::Conflict { .. }
        )
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Decode(err.to_string())
    }
}
