//! Errors surfaced by [`super::ResilientDataAccess`].

use crate::database::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataAccessError {
    /// Business error from the operation, propagated on the first occurrence
    #[error(transparent)]
    Query(ClientError),

    /// Every attempt failed with a connection error
    #[error("Failed {context} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        context: String,
        attempts: u32,
        last_error: ClientError,
    },

    /// The caller's cancellation signal fired mid-retry
    #[error("Cancelled {context} after {attempts} attempts")]
    Cancelled { context: String, attempts: u32 },
}

impl DataAccessError {
    /// The underlying client error, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            DataAccessError::Query(error) => Some(error),
            DataAccessError::RetriesExhausted { last_error, .. } => Some(last_error),
            DataAccessError::Cancelled { .. } => None,
        }
    }

    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, DataAccessError::RetriesExhausted { .. })
    }
}

pub type DataAccessResult<T> = Result<T, DataAccessError>;
