/// Pharmacy routes
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::require_patient_id;
use crate::{
    errors::QueueResult,
    webserver::{
        state::AppState,
        utils::{success_ack, success_response, JsonBody},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub patient_id: Option<String>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pharmacy/queue", get(pharmacy_queue))
        .route("/pharmacy/complete", post(complete_pharmacy))
}

/// GET /api/pharmacy/queue
async fn pharmacy_queue(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.store.pharmacy_queue().await)
}

/// POST /api/pharmacy/complete
async fn complete_pharmacy(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CheckoutRequest>,
) -> QueueResult<Response> {
    let patient_id = require_patient_id(request.patient_id.as_deref())?;
    state.store.complete_pharmacy(&patient_id).await?;
    Ok(success_ack())
}
