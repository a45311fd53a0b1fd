//! Query and record embeddings via an external embedding service.
//!
//! The service is a collaborator, not a local model: the pipeline only needs
//! `text -> fixed-length vector` and treats any upstream failure as a failed
//! request. [`OpenAiEmbedder`] talks to an OpenAI-compatible endpoint;
//! [`MockEmbedder`] is a deterministic stand-in for tests.

mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod openai;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use openai::{DEFAULT_EMBEDDING_MODEL, OpenAiEmbedder};

/// Dimensionality of produced vectors (OpenAI `text-embedding-3-small`).
pub const EMBEDDING_DIM: usize = 1536;

/// Minimal async interface used by the search pipeline and the CRUD surface.
pub trait Embedder: Send + Sync {
    /// Produces a fixed-length embedding for `text`.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}
