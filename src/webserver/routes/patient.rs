/// Patient-facing lookup
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    errors::QueueError,
    webserver::{state::AppState, utils::success_response},
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/patient/status/:id", get(patient_status))
}

/// GET /api/patient/status/:id
///
/// Not-found uses the same bare `{"error": ...}` payload as the patient stream.
async fn patient_status(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.store.patient_status(&id).await {
        Ok(status) => success_response(status),
        Err(QueueError::NotFound(message)) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
        }
        Err(err) => err.into_response(),
    }
}
