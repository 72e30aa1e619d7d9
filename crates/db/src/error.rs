use thiserror::Error;

/// Failures surfaced by a [`crate::DocumentStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("document store operation failed: {0}")]
    Backend(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
}
