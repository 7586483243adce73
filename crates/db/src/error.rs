use thiserror::Error;

/// Errors surfaced by document store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid document id '{0}'")]
    InvalidId(String),

    #[error("field '{0}' is reserved by the store")]
    ReservedField(String),

    #[error("update requires at least one field")]
    EmptyUpdate,

    #[error("unexpected document shape: {0}")]
    UnexpectedDocument(String),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
