/// Doctor routes: own queue and consultations
///
/// There is no session layer, so the acting doctor is named in the request.
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::require_patient_id;
use crate::{
    errors::{QueueError, QueueResult},
    logger::{self, LogTag},
    models::{deserialize_optional_staff_id, StaffId},
    webserver::{
        state::AppState,
        utils::{success_ack, success_response, JsonBody},
    },
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    #[serde(default, deserialize_with = "deserialize_optional_staff_id")]
    pub doctor_id: Option<StaffId>,
    pub patient_id: Option<String>,
    pub prescription: Option<String>,
}

impl ConsultationRequest {
    fn doctor(&self) -> QueueResult<StaffId> {
        self.doctor_id
            .ok_or_else(|| QueueError::Validation("Missing doctor ID".to_string()))
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/doctor/:doctor_id/queue", get(doctor_queue))
        .route("/doctor/start-consultation", post(start_consultation))
        .route("/doctor/complete-consultation", post(complete_consultation))
}

/// GET /api/doctor/:doctor_id/queue
async fn doctor_queue(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<StaffId>,
) -> QueueResult<Response> {
    Ok(success_response(state.store.doctor_queue(doctor_id).await?))
}

/// POST /api/doctor/start-consultation
async fn start_consultation(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<ConsultationRequest>,
) -> QueueResult<Response> {
    let patient_id = require_patient_id(request.patient_id.as_deref())?;
    state.store.start_consultation(request.doctor()?, &patient_id).await?;
    Ok(success_ack())
}

/// POST /api/doctor/complete-consultation
async fn complete_consultation(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<ConsultationRequest>,
) -> QueueResult<Response> {
    let patient_id = require_patient_id(request.patient_id.as_deref())?;
    logger::verbose(
        LogTag::Api,
        &format!("Completing consultation for {}: {:?}", patient_id, request.prescription),
    );
    state
        .store
        .complete_consultation(request.doctor()?, &patient_id, request.prescription.as_deref())
        .await?;
    Ok(success_ack())
}
