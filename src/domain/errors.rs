use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {0}")]
    Internal(String),

    /// Failure reported by (or while talking to) the document store.
    #[error("Document store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// The bare message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Internal(msg) | Self::Store(msg) => msg,
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
