//! Errors surfaced by the application helpers

use customer_storage::config::ConfigError;
use customer_storage::StorageError;
use thiserror::Error;

/// Result type for the application helpers
pub type AppResult<T> = Result<T, AppError>;

/// Either half of the call chain failed; the underlying error is passed through untouched
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded, nothing was sent to storage
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The container reported a failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}
