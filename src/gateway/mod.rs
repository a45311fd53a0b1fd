//! HTTP gateway (Axum) for search and the admin CRUD surface.

pub mod cafes;
pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;
pub use handler::search_handler;
pub use state::AppState;

use crate::embedding::Embedder;
use crate::store::RecordStore;
use crate::vectordb::VectorIndex;

pub fn create_router_with_state<E, V, R>(state: AppState<E, V, R>) -> Router
where
    E: Embedder + Clone + Send + Sync + 'static,
    V: VectorIndex + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/search", post(search_handler))
        .route(
            "/api/cafes",
            get(cafes::list_cafes)
                .post(cafes::create_cafe)
                .put(cafes::update_cafe)
                .delete(cafes::delete_cafe),
        )
        .route("/api/cafes/{list_id}", get(cafes::get_cafe))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
