use crate::cache::CacheError;
use crate::config::ConfigurationError;
use crate::database::ClientError;
use crate::resilience::DataAccessError;

/// Crate-level error
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Database error: {0}")]
    Database(#[from] ClientError),

    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
