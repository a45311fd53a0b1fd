use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by record store operations.
pub enum StoreError {
    /// Could not open or create the backing database.
    #[error("failed to open database at '{path}': {message}")]
    OpenFailed {
        /// Database path.
        path: String,
        /// Error message.
        message: String,
    },

    /// A statement failed to execute.
    #[error("database query failed: {message}")]
    QueryFailed {
        /// Error message.
        message: String,
    },

    /// A stored row could not be decoded into a record.
    #[error("failed to decode cafe record: {message}")]
    DecodeFailed {
        /// Error message.
        message: String,
    },

    /// A record field could not be encoded for storage.
    #[error("failed to encode cafe record: {message}")]
    EncodeFailed {
        /// Error message.
        message: String,
    },

    /// No record matched the given place id.
    #[error("cafe not found: {list_id}")]
    NotFound {
        /// External place id.
        list_id: String,
    },
}

impl From<libsql::Error> for StoreError {
    fn from(err: libsql::Error) -> Self {
        StoreError::QueryFailed {
            message: err.to_string(),
        }
    }
}
