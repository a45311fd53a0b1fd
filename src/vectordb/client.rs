use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, PointStruct, PointsIdsList,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};

use super::error::VectorDbError;
use super::model::CandidateMatch;

/// Minimal async interface used by the search pipeline and the CRUD surface.
pub trait VectorIndex: Send + Sync {
    /// Ensures the backing collection exists.
    fn ensure_collection(
        &self,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Returns up to `top_k` candidates ranked by similarity descending.
    fn query(
        &self,
        vector: &[f32],
        top_k: u64,
    ) -> impl std::future::Future<Output = Result<Vec<CandidateMatch>, VectorDbError>> + Send;

    /// Inserts or replaces the point for a cafe record.
    fn upsert(
        &self,
        id: &str,
        vector: Vec<f32>,
    ) -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;

    /// Removes the point for a cafe record, if present.
    fn delete(&self, id: &str)
    -> impl std::future::Future<Output = Result<(), VectorDbError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed vector index.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
    vector_size: u64,
}

impl QdrantIndex {
    /// Creates an index client for `url`.
    pub async fn connect(
        url: &str,
        collection: impl Into<String>,
        vector_size: u64,
    ) -> Result<Self, VectorDbError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
            vector_size,
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

impl VectorIndex for QdrantIndex {
    async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if !exists {
            let vectors_config = VectorParamsBuilder::new(self.vector_size, Distance::Cosine);

            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(vectors_config),
                )
                .await
                .map_err(|e| VectorDbError::CreateCollectionFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: u64) -> Result<Vec<CandidateMatch>, VectorDbError> {
        let search = SearchPointsBuilder::new(&self.collection, vector.to_vec(), top_k);

        let response =
            self.client
                .search_points(search)
                .await
                .map_err(|e| VectorDbError::SearchFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;

        Ok(response
            .result
            .into_iter()
            .filter_map(CandidateMatch::from_scored_point)
            .collect())
    }

    async fn upsert(&self, id: &str, vector: Vec<f32>) -> Result<(), VectorDbError> {
        if vector.len() as u64 != self.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: self.vector_size as usize,
                actual: vector.len(),
            });
        }

        let point = PointStruct::new(id.to_string(), vector, Payload::new());

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]).wait(true))
            .await
            .map_err(|e| VectorDbError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), VectorDbError> {
        let points_selector = PointsIdsList {
            ids: vec![id.to_string().into()],
        };

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(points_selector)
                    .wait(true),
            )
            .await
            .map_err(|e| VectorDbError::DeleteFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}
