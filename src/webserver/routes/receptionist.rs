/// Front-desk routes: registration and the waiting room
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    errors::QueueResult,
    logger::{self, LogTag},
    store::NewPatient,
    webserver::{
        state::AppState,
        utils::{success_response, success_with, JsonBody},
    },
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/receptionist/register", post(register_patient))
        .route("/receptionist/doctors", get(list_doctors))
        .route("/receptionist/waiting-patients", get(waiting_patients))
}

/// POST /api/receptionist/register
async fn register_patient(
    State(state): State<Arc<AppState>>,
    JsonBody(form): JsonBody<NewPatient>,
) -> QueueResult<Response> {
    logger::verbose(LogTag::Api, &format!("Register request: {:?}", form));
    let registered = state.store.register_patient(form).await?;
    Ok(success_with(serde_json::to_value(registered)?))
}

/// GET /api/receptionist/doctors
async fn list_doctors(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.store.list_doctors().await)
}

/// GET /api/receptionist/waiting-patients
async fn waiting_patients(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.store.waiting_patients().await)
}
