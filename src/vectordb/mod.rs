//! Qdrant vector index over cafe embeddings.
//!
//! One point per cafe record, keyed by the record id, cosine distance. The
//! CRUD surface keeps the index approximately in sync with the record store;
//! the search pipeline only queries it.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{QdrantIndex, VectorIndex};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorIndex, cosine_similarity};
pub use model::CandidateMatch;

/// Qdrant collection holding one point per cafe record.
pub const DEFAULT_COLLECTION_NAME: &str = "cafes";

/// Dimensionality of stored vectors.
pub const DEFAULT_VECTOR_SIZE: u64 = crate::embedding::EMBEDDING_DIM as u64;
