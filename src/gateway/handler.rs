use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use super::error::ApiError;
use super::payload::{SearchRequest, SearchResponse};
use super::state::AppState;
use crate::embedding::Embedder;
use crate::store::RecordStore;
use crate::vectordb::VectorIndex;

/// `POST /api/search` — runs the query-to-results pipeline.
///
/// Responds 200 with a ranked page, 204 when the search succeeded but found
/// nothing (a distinguished no-results signal, not an error), 400 for an
/// empty query, and 502 when an upstream collaborator failed.
#[instrument(skip(state, request), fields(session = %request.session_id))]
pub async fn search_handler<E, V, R>(
    State(state): State<AppState<E, V, R>>,
    Json(request): Json<SearchRequest>,
) -> Result<Response, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    // An authenticated identity keeps pagination stable across devices;
    // otherwise the browser session token scopes the conversation.
    let search_key = request.user_id.as_deref().unwrap_or(&request.session_id);

    let reply = state.engine.search(&request.query, search_key).await?;

    if reply.results.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body = SearchResponse {
        results: reply.results,
        has_more: reply.has_more,
        offset: reply.offset,
        session_id: request.session_id,
    };

    Ok((StatusCode::OK, Json(body)).into_response())
}
