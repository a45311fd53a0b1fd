//! Cafefinder library crate (used by the server binary and integration
//! tests).
//!
//! # Public API Surface
//!
//! - [`SearchEngine`], [`SearchReply`], [`RankedResult`], [`FusionWeights`] -
//!   the query-to-results pipeline
//! - [`SessionStore`], [`SearchSession`] - follow-up pagination state
//! - [`name_similarity`] - lexical scoring used by fusion
//! - [`Embedder`], [`OpenAiEmbedder`] - embedding generation
//! - [`VectorIndex`], [`QdrantIndex`], [`CandidateMatch`] - vector retrieval
//! - [`RecordStore`], [`LibsqlStore`], [`CafeRecord`] - record persistence
//! - [`create_router_with_state`], [`AppState`] - the HTTP gateway
//! - [`Config`], [`ConfigError`] - server configuration
//!
//! Mock collaborators are available behind `#[cfg(any(test, feature =
//! "mock"))]`.

pub mod config;
pub mod embedding;
pub mod gateway;
pub mod search;
pub mod session;
pub mod similarity;
pub mod store;
pub mod vectordb;

pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{DEFAULT_EMBEDDING_MODEL, EMBEDDING_DIM, Embedder, EmbeddingError, OpenAiEmbedder};
pub use gateway::{ApiError, AppState, create_router_with_state};
pub use search::{FusionWeights, RankedResult, SearchEngine, SearchError, SearchReply};
pub use session::{DEFAULT_SESSION_TTL_SECS, SearchSession, SessionStore};
pub use similarity::name_similarity;
#[cfg(any(test, feature = "mock"))]
pub use store::MockRecordStore;
pub use store::{CafeDetails, CafeRecord, LibsqlStore, RecordStore, StoreError};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorIndex;
pub use vectordb::{
    CandidateMatch, DEFAULT_COLLECTION_NAME, DEFAULT_VECTOR_SIZE, QdrantIndex, VectorDbError,
    VectorIndex,
};
