use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

/// Ranked candidate returned by a vector index query.
///
/// Exists only within one request's processing; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch {
    /// Cafe record id the indexed vector belongs to.
    pub id: String,
    /// Similarity score, higher is closer.
    pub score: f32,
}

impl CandidateMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }

    /// Extracts id and score from a Qdrant scored point. Points without a
    /// usable id are skipped.
    pub(crate) fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Uuid(uuid)) => uuid,
            Some(PointIdOptions::Num(num)) => num.to_string(),
            None => return None,
        };

        Some(Self {
            id,
            score: point.score,
        })
    }
}
