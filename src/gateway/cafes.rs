//! Admin CRUD surface for cafe records.
//!
//! Record mutations keep the vector index approximately in sync: the index
//! update is best-effort, logged on failure and never fatal to the record
//! mutation itself. A stale index entry is corrected by the next update.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{error, instrument};

use super::error::ApiError;
use super::payload::{CreateCafeRequest, DeleteCafeRequest, MessageResponse, UpdateCafeRequest};
use super::state::AppState;
use crate::embedding::Embedder;
use crate::store::{CafeDetails, CafeRecord, RecordStore};
use crate::vectordb::VectorIndex;

/// `GET /api/cafes` — every record, newest first.
pub async fn list_cafes<E, V, R>(
    State(state): State<AppState<E, V, R>>,
) -> Result<Json<Vec<CafeRecord>>, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    Ok(Json(state.records.list_all().await?))
}

/// `GET /api/cafes/{list_id}` — one record by its external place id.
pub async fn get_cafe<E, V, R>(
    State(state): State<AppState<E, V, R>>,
    Path(list_id): Path<String>,
) -> Result<Json<CafeRecord>, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    let record = state
        .records
        .get_by_list_id(&list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("cafe not found: {list_id}")))?;

    Ok(Json(record))
}

/// `POST /api/cafes` — creates a record from the maps-API import surface.
///
/// Detail fields start empty, so there is no embedding text yet and no index
/// entry; the first detail update indexes the record.
#[instrument(skip(state, request), fields(list_id = %request.list_id))]
pub async fn create_cafe<E, V, R>(
    State(state): State<AppState<E, V, R>>,
    Json(request): Json<CreateCafeRequest>,
) -> Result<Response, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    let record = CafeRecord::new(
        request.list_id,
        request.name,
        request.address,
        request.img,
        Utc::now(),
    );

    state.records.insert(&record).await?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

/// `PUT /api/cafes` — applies curator detail fields, then refreshes the
/// record's index entry best-effort.
#[instrument(skip(state, request), fields(list_id = %request.list_id))]
pub async fn update_cafe<E, V, R>(
    State(state): State<AppState<E, V, R>>,
    Json(request): Json<UpdateCafeRequest>,
) -> Result<Json<CafeRecord>, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    let details = CafeDetails {
        description: request.description,
        my_comment: request.my_comment,
        instagram: request.instagram,
        keywords: request.keywords,
    };

    let record = state
        .records
        .update_details(&request.list_id, &details, Utc::now())
        .await?;

    // The record mutation has already succeeded; embedding and indexing the
    // refreshed text must not undo it.
    match state.embedder.embed(&record.embedding_input()).await {
        Ok(embedding) => {
            if let Err(e) = state.index.upsert(&record.id, embedding).await {
                error!(error = %e, id = %record.id, "vector index upsert failed");
            }
        }
        Err(e) => error!(error = %e, id = %record.id, "embedding for index update failed"),
    }

    Ok(Json(record))
}

/// `DELETE /api/cafes` — removes a record, then its index entry best-effort.
#[instrument(skip(state, request), fields(id = %request.id))]
pub async fn delete_cafe<E, V, R>(
    State(state): State<AppState<E, V, R>>,
    Json(request): Json<DeleteCafeRequest>,
) -> Result<Json<MessageResponse>, ApiError>
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    let deleted = state.records.delete(&request.id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("cafe not found: {}", request.id)));
    }

    if let Err(e) = state.index.delete(&request.id).await {
        error!(error = %e, id = %request.id, "vector index delete failed");
    }

    Ok(Json(MessageResponse {
        message: "cafe deleted".to_string(),
    }))
}
