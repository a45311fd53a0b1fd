use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::store::StoreError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by the search pipeline.
///
/// Only [`InvalidQuery`](Self::InvalidQuery) is user-correctable; the rest
/// are upstream-dependency failures. A failed search never returns partial
/// results and never mutates session state.
pub enum SearchError {
    /// Query was empty or whitespace-only; rejected before any external call.
    #[error("search query must not be empty")]
    InvalidQuery,

    /// Embedding generation failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector retrieval failed.
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] VectorDbError),

    /// Record hydration failed.
    #[error("record lookup failed: {0}")]
    Store(#[from] StoreError),
}
