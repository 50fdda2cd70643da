//! Error types for container operations

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Result type for container and repository operations
pub type StorageResult<T> = Result<T, StorageError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Status reported for a missing item or container
const NOT_FOUND: u16 = 404;

/// Failure reported by a storage container
///
/// The document database does not agree with itself about where a status lives: some failures
/// only carry the HTTP status of the response, others only carry a service error code. Both are
/// kept side by side so callers can inspect either one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StorageError {
    status_code: Option<u16>,
    code: Option<u16>,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl StorageError {
    /// Creates an error with neither status field set
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Item or container does not exist
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_code(NOT_FOUND)
    }

    /// Item already exists
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message).with_code(409)
    }

    /// Request was rejected before reaching the store
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).with_code(400)
    }

    /// Sets the HTTP status of the failed response
    #[must_use]
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Sets the status derived from the service error code
    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    /// Attaches the underlying error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status of the failed response, if the failure came from one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Status derived from the service error code, if any
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        self.code
    }

    /// Human readable description of the failure
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Returns whether `error` reports a missing item or container
///
/// Either status field may carry the 404, so both are checked.
#[must_use]
pub fn is_not_found(error: &StorageError) -> bool {
    error.status_code == Some(NOT_FOUND) || error.code == Some(NOT_FOUND)
}

/// Maps a `DynamoDB` service error code onto the equivalent HTTP status
fn status_for_service_code(code: &str) -> Option<u16> {
    match code {
        "ResourceNotFoundException" => Some(NOT_FOUND),
        "ConditionalCheckFailedException" => Some(412),
        "TransactionConflictException" => Some(409),
        "ProvisionedThroughputExceededException"
        | "RequestLimitExceeded"
        | "ThrottlingException" => Some(429),
        "ValidationException" => Some(400),
        "InternalServerError" => Some(500),
        _ => None,
    }
}

/// Joins the messages of `err` and its sources
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl<E> From<SdkError<E>> for StorageError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    fn from(err: SdkError<E>) -> Self {
        let status_code = err.raw_response().map(|raw| raw.status().as_u16());
        let code = err.code().and_then(status_for_service_code);
        // The raw response stays reachable through `source` only
        let message = match &err {
            SdkError::ServiceError(service) => service.err().to_string(),
            other => error_chain(other),
        };

        Self {
            status_code,
            code,
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_dynamo::Error> for StorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::new(format!("Serialization error: {err}")).with_source(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Failed to parse document: {err}")).with_source(err)
    }
}
