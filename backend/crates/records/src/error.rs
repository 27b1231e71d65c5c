//! Records Error Types

use kernel::error::app_error::AppError;
use kernel::error::kind::ErrorKind;
use thiserror::Error;

/// Records-specific result type alias
pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(Debug, Error)]
pub enum RecordsError {
    /// Table name is not a safe SQL identifier
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    /// Store failure; the batch was rolled back
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RecordsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecordsError::InvalidTableName(_) => ErrorKind::BadRequest,
            RecordsError::Store(_) => ErrorKind::InternalServerError,
        }
    }
}

impl From<RecordsError> for AppError {
    fn from(err: RecordsError) -> Self {
        match err {
            RecordsError::Store(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()).with_code("INVALID_TABLE_NAME"),
        }
    }
}
