//! Query orchestration: the query-to-results pipeline.
//!
//! One [`SearchEngine::search`] call drives the whole pipeline: validate the
//! query, detect follow-up intent, resolve an embedding (fresh or reused from
//! the session), retrieve ranked candidates, window and deduplicate them,
//! hydrate records, fuse vector and lexical scores, sort, truncate, and
//! finally record pagination state for the next follow-up.
//!
//! Requests for different search keys are fully independent. For one key,
//! overlapping requests race on the session store with last-write-wins
//! semantics; two concurrent follow-ups may serve the same page. The session
//! write is the last step, so a failed or cancelled request leaves the
//! cursor untouched.

pub mod error;
pub mod intent;

#[cfg(test)]
mod tests;

pub use error::SearchError;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::embedding::Embedder;
use crate::session::{SearchSession, SessionStore};
use crate::similarity::name_similarity;
use crate::store::{CafeRecord, RecordStore};
use crate::vectordb::{CandidateMatch, VectorIndex};

/// Extra candidates fetched beyond the page, as a multiple of the page size,
/// so deduplication does not starve a page.
const RETRIEVAL_SLACK: usize = 2;

/// Relative weight of lexical name similarity vs. vector similarity in the
/// fused relevance score.
///
/// These are tunables, not derived constants. The default heavily favors
/// vector similarity; the lexical component mostly separates candidates
/// whose names literally match the query from semantically close ones.
#[derive(Debug, Clone, Copy)]
pub struct FusionWeights {
    pub lexical: f32,
    pub vector: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            lexical: 0.05,
            vector: 0.95,
        }
    }
}

impl FusionWeights {
    pub fn new(lexical: f32, vector: f32) -> Self {
        Self { lexical, vector }
    }

    fn combine(&self, lexical: f32, vector: f32) -> f32 {
        lexical * self.lexical + vector * self.vector
    }
}

/// One search result as returned to the client.
///
/// Derived per request, never stored. The record's free-text fields are
/// deliberately absent — only name, keywords, address, and instagram leave
/// the service in bulk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub list_id: String,
    pub name: String,
    pub instagram: Option<String>,
    pub address: String,
    pub keywords: Vec<String>,
    pub relevance_score: f32,
    pub name_similarity: f32,
    pub vector_similarity: f32,
}

/// Outcome of one orchestrated search.
#[derive(Debug, Clone)]
pub struct SearchReply {
    /// Ranked page of results; empty is a valid, successful outcome.
    pub results: Vec<RankedResult>,
    /// Whether the retriever had candidates beyond this page.
    pub has_more: bool,
    /// Offset this page was served at.
    pub offset: usize,
}

/// The query-to-results pipeline, generic over its collaborators so tests
/// swap in mocks and deployments swap backends without touching the
/// pipeline itself.
pub struct SearchEngine<E, V, R> {
    embedder: E,
    index: V,
    records: R,
    sessions: Arc<SessionStore>,
    weights: FusionWeights,
}

impl<E, V, R> SearchEngine<E, V, R>
where
    E: Embedder,
    V: VectorIndex,
    R: RecordStore,
{
    pub fn new(
        embedder: E,
        index: V,
        records: R,
        sessions: Arc<SessionStore>,
        weights: FusionWeights,
    ) -> Self {
        Self {
            embedder,
            index,
            records,
            sessions,
            weights,
        }
    }

    /// Returns the session store backing follow-up pagination.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Runs one search for `search_key` at the current time.
    pub async fn search(&self, query: &str, search_key: &str) -> Result<SearchReply, SearchError> {
        self.search_at(query, search_key, Utc::now()).await
    }

    /// Like [`search`](Self::search) with an explicit clock, so session
    /// expiry and pagination are testable.
    pub async fn search_at(
        &self,
        query: &str,
        search_key: &str,
        now: DateTime<Utc>,
    ) -> Result<SearchReply, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let page_size = intent::requested_page_size(query);

        // A follow-up reuses the previous embedding and advances the cursor;
        // anything else re-embeds from scratch. An expired session is never
        // reused, so a late follow-up silently becomes a fresh search.
        let previous = if intent::is_follow_up(query) {
            self.sessions.get(search_key, now)
        } else {
            None
        };

        let (embedding, offset) = match previous {
            Some(session) => {
                let offset = session.last_offset + page_size;
                debug!(offset, "follow-up query, reusing session embedding");
                (session.embedding, offset)
            }
            None => (self.embedder.embed(query).await?, 0),
        };

        // Over-fetch so dropped duplicates cannot starve the page.
        let window = page_size * RETRIEVAL_SLACK;
        let matches = self.index.query(&embedding, (offset + window) as u64).await?;
        let has_more = matches.len() > offset + page_size;

        // Window the ranked list, keeping the first (highest-scoring)
        // occurrence of each id.
        let mut seen = HashSet::new();
        let candidates: Vec<CandidateMatch> = matches
            .into_iter()
            .skip(offset)
            .take(window)
            .filter(|candidate| seen.insert(candidate.id.clone()))
            .collect();

        let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
        let cafes = self.records.find_by_ids(&ids).await?;

        let mut results = self.fuse(query, &candidates, cafes);
        results.truncate(page_size);

        // Only reached once every fallible step has succeeded; a failed
        // request never moves the cursor. The stored offset is the one this
        // page was served at — the next follow-up advances it.
        self.sessions.put(
            search_key,
            SearchSession {
                query: query.to_string(),
                embedding,
                last_offset: offset,
                updated_at: now,
            },
        );

        Ok(SearchReply {
            results,
            has_more,
            offset,
        })
    }

    /// Scores hydrated records against the candidate set and sorts by fused
    /// relevance, original candidate rank breaking ties.
    fn fuse(
        &self,
        query: &str,
        candidates: &[CandidateMatch],
        cafes: Vec<CafeRecord>,
    ) -> Vec<RankedResult> {
        let ranks: HashMap<&str, (usize, f32)> = candidates
            .iter()
            .enumerate()
            .map(|(rank, candidate)| (candidate.id.as_str(), (rank, candidate.score)))
            .collect();

        let mut scored: Vec<(usize, RankedResult)> = cafes
            .into_iter()
            .map(|cafe| {
                // A record without a matching candidate scores zero on the
                // vector axis rather than failing the request.
                let (rank, vector_similarity) = ranks
                    .get(cafe.id.as_str())
                    .copied()
                    .unwrap_or((usize::MAX, 0.0));
                let lexical = name_similarity(&cafe.name, query);

                let result = RankedResult {
                    list_id: cafe.list_id,
                    name: cafe.name,
                    instagram: cafe.instagram,
                    address: cafe.address,
                    keywords: cafe.keywords,
                    relevance_score: self.weights.combine(lexical, vector_similarity),
                    name_similarity: lexical,
                    vector_similarity,
                };

                (rank, result)
            })
            .collect();

        scored.sort_by(|(rank_a, a), (rank_b, b)| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(Ordering::Equal)
                .then(rank_a.cmp(rank_b))
        });

        scored.into_iter().map(|(_, result)| result).collect()
    }
}
