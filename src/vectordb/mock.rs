use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::client::VectorIndex;
use super::error::VectorDbError;
use super::model::CandidateMatch;

const MOCK_COLLECTION: &str = "mock";

/// In-memory stand-in for the Qdrant index.
///
/// Two modes: points inserted through `upsert` are scored by cosine
/// similarity against the query vector, or a fixed ranked candidate list can
/// be installed with [`set_ranked`](Self::set_ranked) so pipeline tests
/// control ordering exactly. Every query vector is recorded either way.
#[derive(Clone)]
pub struct MockVectorIndex {
    inner: Arc<Inner>,
}

struct Inner {
    vector_size: u64,
    points: RwLock<HashMap<String, Vec<f32>>>,
    ranked: RwLock<Option<Vec<CandidateMatch>>>,
    queries: RwLock<Vec<Vec<f32>>>,
    fail_search: AtomicBool,
    fail_mutations: AtomicBool,
}

impl MockVectorIndex {
    pub fn new(vector_size: u64) -> Self {
        Self {
            inner: Arc::new(Inner {
                vector_size,
                points: RwLock::new(HashMap::new()),
                ranked: RwLock::new(None),
                queries: RwLock::new(Vec::new()),
                fail_search: AtomicBool::new(false),
                fail_mutations: AtomicBool::new(false),
            }),
        }
    }

    /// Installs a fixed ranked result list returned (prefix-truncated to
    /// `top_k`) by every subsequent query.
    pub fn set_ranked(&self, candidates: Vec<CandidateMatch>) {
        *self.inner.ranked.write() = Some(candidates);
    }

    /// Makes every subsequent query fail until reset.
    pub fn set_fail_search(&self, failing: bool) {
        self.inner.fail_search.store(failing, Ordering::SeqCst);
    }

    /// Makes every subsequent upsert/delete fail until reset.
    pub fn set_fail_mutations(&self, failing: bool) {
        self.inner.fail_mutations.store(failing, Ordering::SeqCst);
    }

    /// Query vectors received so far, in call order.
    pub fn queries(&self) -> Vec<Vec<f32>> {
        self.inner.queries.read().clone()
    }

    pub fn point_count(&self) -> usize {
        self.inner.points.read().len()
    }

    pub fn contains_point(&self, id: &str) -> bool {
        self.inner.points.read().contains_key(id)
    }
}

impl VectorIndex for MockVectorIndex {
    async fn ensure_collection(&self) -> Result<(), VectorDbError> {
        Ok(())
    }

    async fn query(&self, vector: &[f32], top_k: u64) -> Result<Vec<CandidateMatch>, VectorDbError> {
        self.inner.queries.write().push(vector.to_vec());

        if self.inner.fail_search.load(Ordering::SeqCst) {
            return Err(VectorDbError::SearchFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "mock search failure".to_string(),
            });
        }

        if let Some(ranked) = self.inner.ranked.read().as_ref() {
            return Ok(ranked.iter().take(top_k as usize).cloned().collect());
        }

        let points = self.inner.points.read();
        let mut results: Vec<CandidateMatch> = points
            .iter()
            .map(|(id, stored)| CandidateMatch::new(id.clone(), cosine_similarity(vector, stored)))
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k as usize);

        Ok(results)
    }

    async fn upsert(&self, id: &str, vector: Vec<f32>) -> Result<(), VectorDbError> {
        if self.inner.fail_mutations.load(Ordering::SeqCst) {
            return Err(VectorDbError::UpsertFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "mock upsert failure".to_string(),
            });
        }

        if vector.len() as u64 != self.inner.vector_size {
            return Err(VectorDbError::InvalidDimension {
                expected: self.inner.vector_size as usize,
                actual: vector.len(),
            });
        }

        self.inner.points.write().insert(id.to_string(), vector);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), VectorDbError> {
        if self.inner.fail_mutations.load(Ordering::SeqCst) {
            return Err(VectorDbError::DeleteFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "mock delete failure".to_string(),
            });
        }

        self.inner.points.write().remove(id);
        Ok(())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
