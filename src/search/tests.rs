use chrono::{Duration, Utc};
use std::sync::Arc;

use super::{FusionWeights, SearchEngine, SearchError};
use crate::embedding::MockEmbedder;
use crate::session::SessionStore;
use crate::similarity::name_similarity;
use crate::store::{CafeRecord, MockRecordStore, RecordStore};
use crate::vectordb::{CandidateMatch, MockVectorIndex};

const DIM: u64 = crate::embedding::EMBEDDING_DIM as u64;
const FRESH_QUERY: &str = "cozy cafe with good coffee";

struct Fixture {
    embedder: MockEmbedder,
    index: MockVectorIndex,
    records: MockRecordStore,
    engine: SearchEngine<MockEmbedder, MockVectorIndex, MockRecordStore>,
}

fn fixture_with(weights: FusionWeights, sessions: SessionStore) -> Fixture {
    let embedder = MockEmbedder::new();
    let index = MockVectorIndex::new(DIM);
    let records = MockRecordStore::new();
    let engine = SearchEngine::new(
        embedder.clone(),
        index.clone(),
        records.clone(),
        Arc::new(sessions),
        weights,
    );

    Fixture {
        embedder,
        index,
        records,
        engine,
    }
}

fn fixture() -> Fixture {
    fixture_with(FusionWeights::default(), SessionStore::with_default_ttl())
}

async fn seed_cafes(records: &MockRecordStore, count: usize) {
    for i in 0..count {
        let mut record = CafeRecord::new(
            format!("place-{i}"),
            format!("Cafe Number {i}"),
            format!("{i} Bean St"),
            None,
            Utc::now(),
        );
        record.id = format!("cafe-{i}");
        records.insert(&record).await.unwrap();
    }
}

/// Candidates `cafe-0..count` with strictly descending scores. The gaps are
/// wide enough that the default lexical weight cannot reorder neighbors.
fn ranked_candidates(count: usize) -> Vec<CandidateMatch> {
    (0..count)
        .map(|i| CandidateMatch::new(format!("cafe-{i}"), 1.0 - i as f32 * 0.05))
        .collect()
}

#[tokio::test]
async fn test_empty_query_rejected_before_any_external_call() {
    let f = fixture();

    for query in ["", "   ", "\t\n"] {
        let result = f.engine.search(query, "user-1").await;
        assert!(matches!(result, Err(SearchError::InvalidQuery)), "{query:?}");
    }

    assert_eq!(f.embedder.call_count(), 0);
    assert!(f.index.queries().is_empty());
}

#[tokio::test]
async fn test_fresh_search_serves_first_page() {
    let f = fixture();
    seed_cafes(&f.records, 8).await;
    f.index.set_ranked(ranked_candidates(8));

    let reply = f.engine.search(FRESH_QUERY, "user-1").await.unwrap();

    assert_eq!(reply.offset, 0);
    assert_eq!(reply.results.len(), 6);
    assert!(reply.has_more, "8 candidates exceed one page of 6");
    assert_eq!(f.embedder.call_count(), 1);

    // Ranked order is preserved through hydration and fusion.
    let list_ids: Vec<&str> = reply.results.iter().map(|r| r.list_id.as_str()).collect();
    assert_eq!(
        list_ids,
        vec!["place-0", "place-1", "place-2", "place-3", "place-4", "place-5"]
    );

    // The retriever saw the freshly generated embedding.
    let queries = f.index.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0], MockEmbedder::embedding_for(FRESH_QUERY));
}

#[tokio::test]
async fn test_follow_up_reuses_embedding_and_advances_offset() {
    let f = fixture();
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let first = f.engine.search(FRESH_QUERY, "user-1").await.unwrap();
    assert_eq!(first.offset, 0);

    let second = f.engine.search("show me more", "user-1").await.unwrap();

    // The stored embedding was reused: no second embedding call, and the
    // retriever received the identical vector.
    assert_eq!(f.embedder.call_count(), 1);
    let queries = f.index.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], queries[1]);

    assert_eq!(second.offset, 6);
    assert_eq!(second.results.len(), 6);
    assert_eq!(second.results[0].list_id, "place-6");
    assert!(second.has_more, "15 candidates exceed offset 6 + page 6");

    let third = f.engine.search("even more please", "user-1").await.unwrap();
    assert_eq!(third.offset, 12);
    assert_eq!(third.results.len(), 3);
    assert_eq!(third.results[0].list_id, "place-12");
    assert!(!third.has_more);
}

#[tokio::test]
async fn test_follow_up_without_a_session_is_a_fresh_search() {
    let f = fixture();
    seed_cafes(&f.records, 8).await;
    f.index.set_ranked(ranked_candidates(8));

    let reply = f.engine.search("show me more", "user-1").await.unwrap();

    assert_eq!(reply.offset, 0);
    assert_eq!(f.embedder.call_count(), 1);
}

#[tokio::test]
async fn test_expired_session_is_not_reused() {
    let f = fixture_with(FusionWeights::default(), SessionStore::new(Duration::hours(1)));
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let start = Utc::now();
    f.engine.search_at(FRESH_QUERY, "user-1", start).await.unwrap();

    let reply = f
        .engine
        .search_at("show me more", "user-1", start + Duration::minutes(61))
        .await
        .unwrap();

    // 61 minutes later the session is stale: re-embedded, back to page one.
    assert_eq!(reply.offset, 0);
    assert_eq!(f.embedder.call_count(), 2);
}

#[tokio::test]
async fn test_session_near_expiry_is_still_reused() {
    let f = fixture_with(FusionWeights::default(), SessionStore::new(Duration::hours(1)));
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let start = Utc::now();
    f.engine.search_at(FRESH_QUERY, "user-1", start).await.unwrap();

    let reply = f
        .engine
        .search_at("show me more", "user-1", start + Duration::minutes(59))
        .await
        .unwrap();

    assert_eq!(reply.offset, 6);
    assert_eq!(f.embedder.call_count(), 1);
}

#[tokio::test]
async fn test_sessions_are_isolated_per_key() {
    let f = fixture();
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    f.engine.search(FRESH_QUERY, "user-1").await.unwrap();

    // A different key has no session to continue from.
    let reply = f.engine.search("show me more", "user-2").await.unwrap();
    assert_eq!(reply.offset, 0);
    assert_eq!(f.embedder.call_count(), 2);
}

#[tokio::test]
async fn test_duplicate_candidates_keep_first_occurrence() {
    let f = fixture();
    seed_cafes(&f.records, 3).await;
    f.index.set_ranked(vec![
        CandidateMatch::new("cafe-0", 0.9),
        CandidateMatch::new("cafe-1", 0.8),
        CandidateMatch::new("cafe-0", 0.7),
        CandidateMatch::new("cafe-2", 0.6),
    ]);

    let reply = f.engine.search(FRESH_QUERY, "user-1").await.unwrap();

    let list_ids: Vec<&str> = reply.results.iter().map(|r| r.list_id.as_str()).collect();
    assert_eq!(list_ids, vec!["place-0", "place-1", "place-2"]);

    // The retained score is the first (highest) occurrence.
    assert!((reply.results[0].vector_similarity - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn test_fusion_lets_a_name_match_overtake_a_close_vector_score() {
    let f = fixture();

    let mut den = CafeRecord::new("place-den", "Mocha Den", "1 Roast Rd", None, Utc::now());
    den.id = "cafe-den".to_string();
    let mut bottle = CafeRecord::new("place-bottle", "Blue Bottle", "2 Roast Rd", None, Utc::now());
    bottle.id = "cafe-bottle".to_string();
    f.records.insert(&den).await.unwrap();
    f.records.insert(&bottle).await.unwrap();

    f.index.set_ranked(vec![
        CandidateMatch::new("cafe-den", 0.90),
        CandidateMatch::new("cafe-bottle", 0.88),
    ]);

    let reply = f.engine.search("blue bottle", "user-1").await.unwrap();

    // The exact name match wins on the fused score despite the lower vector
    // similarity.
    assert_eq!(reply.results[0].name, "Blue Bottle");
    assert!((reply.results[0].name_similarity - 1.0).abs() < 1e-6);
    assert!((reply.results[0].relevance_score - (0.05 * 1.0 + 0.95 * 0.88)).abs() < 1e-4);
}

#[tokio::test]
async fn test_fusion_weights_are_tunable() {
    let lexical_only = fixture_with(FusionWeights::new(1.0, 0.0), SessionStore::with_default_ttl());
    let vector_only = fixture_with(FusionWeights::new(0.0, 1.0), SessionStore::with_default_ttl());

    for f in [&lexical_only, &vector_only] {
        let mut den = CafeRecord::new("place-den", "Mocha Den", "1 Roast Rd", None, Utc::now());
        den.id = "cafe-den".to_string();
        let mut bottle =
            CafeRecord::new("place-bottle", "Blue Bottle", "2 Roast Rd", None, Utc::now());
        bottle.id = "cafe-bottle".to_string();
        f.records.insert(&den).await.unwrap();
        f.records.insert(&bottle).await.unwrap();

        f.index.set_ranked(vec![
            CandidateMatch::new("cafe-den", 0.90),
            CandidateMatch::new("cafe-bottle", 0.88),
        ]);
    }

    let by_name = lexical_only.engine.search("blue bottle", "u").await.unwrap();
    assert_eq!(by_name.results[0].name, "Blue Bottle");

    let by_vector = vector_only.engine.search("blue bottle", "u").await.unwrap();
    assert_eq!(by_vector.results[0].name, "Mocha Den");
}

#[tokio::test]
async fn test_requested_page_size_flows_through() {
    let f = fixture();
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let reply = f.engine.search("5 quiet cafes", "user-1").await.unwrap();
    assert_eq!(reply.results.len(), 5);
    assert_eq!(reply.offset, 0);

    // The follow-up advances by its own page size.
    let next = f.engine.search("5 more", "user-1").await.unwrap();
    assert_eq!(next.offset, 5);
    assert_eq!(next.results[0].list_id, "place-5");
}

#[tokio::test]
async fn test_oversized_page_request_is_clamped() {
    let f = fixture();
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let reply = f.engine.search("show me 25 cafes", "user-1").await.unwrap();

    assert_eq!(reply.results.len(), 10);
    assert!(reply.has_more);
}

#[tokio::test]
async fn test_empty_hydration_is_success_not_error() {
    let f = fixture();
    f.index.set_ranked(ranked_candidates(4));
    // Record store is empty: the index points at records that no longer
    // exist.

    let now = Utc::now();
    let reply = f.engine.search_at(FRESH_QUERY, "user-1", now).await.unwrap();

    assert!(reply.results.is_empty());
    assert_eq!(reply.offset, 0);

    // The session is still recorded so a follow-up pages forward.
    let session = f.engine.sessions().get("user-1", now).expect("session stored");
    assert_eq!(session.last_offset, 0);
    assert_eq!(session.query, FRESH_QUERY);
}

#[tokio::test]
async fn test_embedder_failure_fails_request_without_session_mutation() {
    let f = fixture();
    f.embedder.set_failing(true);

    let result = f.engine.search(FRESH_QUERY, "user-1").await;

    assert!(matches!(result, Err(SearchError::Embedding(_))));
    assert!(f.index.queries().is_empty(), "retrieval never ran");
    assert!(f.engine.sessions().get("user-1", Utc::now()).is_none());
}

#[tokio::test]
async fn test_retrieval_failure_fails_request_without_session_mutation() {
    let f = fixture();
    f.index.set_fail_search(true);

    let result = f.engine.search(FRESH_QUERY, "user-1").await;

    assert!(matches!(result, Err(SearchError::Retrieval(_))));
    assert!(f.engine.sessions().get("user-1", Utc::now()).is_none());
}

#[tokio::test]
async fn test_store_failure_preserves_previous_cursor() {
    let f = fixture();
    seed_cafes(&f.records, 15).await;
    f.index.set_ranked(ranked_candidates(15));

    let now = Utc::now();
    f.engine.search_at(FRESH_QUERY, "user-1", now).await.unwrap();

    f.records.set_failing(true);
    let result = f.engine.search_at("show me more", "user-1", now).await;
    assert!(matches!(result, Err(SearchError::Store(_))));

    // The failed follow-up did not move the cursor; retrying continues from
    // the first page's offset.
    f.records.set_failing(false);
    let retry = f.engine.search_at("show me more", "user-1", now).await.unwrap();
    assert_eq!(retry.offset, 6);
}

#[tokio::test]
async fn test_end_to_end_scoring_matches_fusion_formula() {
    let f = fixture();
    seed_cafes(&f.records, 8).await;
    f.index.set_ranked(ranked_candidates(8));

    let reply = f.engine.search(FRESH_QUERY, "user-1").await.unwrap();

    assert_eq!(f.embedder.call_count(), 1);
    assert_eq!(reply.results.len(), 6);
    assert!(reply.has_more);

    for (i, result) in reply.results.iter().enumerate() {
        let expected_vector = 1.0 - i as f32 * 0.05;
        let expected_lexical = name_similarity(&result.name, FRESH_QUERY);
        let expected = 0.05 * expected_lexical + 0.95 * expected_vector;

        assert!((result.vector_similarity - expected_vector).abs() < 1e-6);
        assert!((result.relevance_score - expected).abs() < 1e-4, "result {i}");
    }
}
