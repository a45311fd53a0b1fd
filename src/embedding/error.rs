use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding generation.
pub enum EmbeddingError {
    /// The HTTP request to the embedding service could not be completed.
    #[error("embedding request failed: {message}")]
    RequestFailed {
        /// Error message.
        message: String,
    },

    /// The embedding service answered with a non-success status.
    #[error("embedding service returned {status}: {body}")]
    ServiceError {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode embedding response: {message}")]
    DecodeFailed {
        /// Error message.
        message: String,
    },

    /// The response parsed but contained no embedding.
    #[error("embedding service returned no embedding data")]
    EmptyResponse,
}
