use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("key {0} already exists")]
    AlreadyExists(String),

    #[error("key {0} not found")]
    NotFound(String),

    #[error("Failed to access storage backend: {0}")]
    Backend(String),

    #[error("Failed to encode value: {0}")]
    Encode(String),

    #[error("Failed to decode value: {0}")]
    Decode(String),
}

impl RepoError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound(_))
    }

    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(self, RepoError::AlreadyExists(_))
    }
}
