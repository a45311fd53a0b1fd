use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::{EMBEDDING_DIM, Embedder};

/// Deterministic in-memory embedder for tests.
///
/// The same text always maps to the same vector, so reuse of a stored
/// embedding is observable by comparing vectors; `call_count` exposes how
/// often the "service" was actually hit.
#[derive(Clone, Default)]
pub struct MockEmbedder {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `embed` calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `embed` call fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.inner.fail.store(failing, Ordering::SeqCst);
    }

    /// The vector this mock produces for `text`.
    pub fn embedding_for(text: &str) -> Vec<f32> {
        let mut seed = 0u64;
        for byte in text.bytes() {
            seed = seed.wrapping_mul(31).wrapping_add(byte as u64);
        }

        (0..EMBEDDING_DIM)
            .map(|i| {
                let mixed = seed
                    .wrapping_add(i as u64)
                    .wrapping_mul(0x9e37_79b9_7f4a_7c15);
                ((mixed >> 33) % 1000) as f32 / 1000.0
            })
            .collect()
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                message: "mock embedder failure".to_string(),
            });
        }

        Ok(Self::embedding_for(text))
    }
}
