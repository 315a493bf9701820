//! Store-level error type.

use thiserror::Error;

use crate::domain::ValidationError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key already exists. The message is safe to show to users.
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err)
    }
}

impl StoreError {
    /// Map a unique-constraint violation to `Duplicate(message)`; pass
    /// everything else through.
    pub(crate) fn on_unique_violation(err: sqlx::Error, message: impl Into<String>) -> Self {
        if is_unique_violation(&err) {
            StoreError::Duplicate(message.into())
        } else {
            StoreError::Database(err)
        }
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Build a decode error for a column holding a value outside its enum.
pub(crate) fn decode_error<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}
