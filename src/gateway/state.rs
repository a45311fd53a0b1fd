use std::sync::Arc;

use crate::embedding::Embedder;
use crate::search::SearchEngine;
use crate::store::RecordStore;
use crate::vectordb::VectorIndex;

/// Shared state handed to every handler.
///
/// The search engine owns its own handles to the collaborators; the CRUD
/// handlers use the direct handles to mutate records and keep the vector
/// index in sync.
#[derive(Clone)]
pub struct AppState<E, V, R>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    pub engine: Arc<SearchEngine<E, V, R>>,

    pub embedder: E,

    pub index: V,

    pub records: R,
}

impl<E, V, R> AppState<E, V, R>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    pub fn new(engine: Arc<SearchEngine<E, V, R>>, embedder: E, index: V, records: R) -> Self {
        Self {
            engine,
            embedder,
            index,
            records,
        }
    }
}
