use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::errors::{QueueError, QueueResult};
use crate::models::PatientId;
use crate::webserver::state::AppState;

pub mod admin;
pub mod doctor;
pub mod events;
pub mod patient;
pub mod pharmacy;
pub mod receptionist;
pub mod status;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_enabled = state.config.webserver.cors_enabled;
    let router = Router::new().nest("/api", api_routes()).with_state(state);

    if cors_enabled {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Build API routes
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .merge(events::routes())
        .merge(patient::routes())
        .merge(receptionist::routes())
        .merge(doctor::routes())
        .merge(pharmacy::routes())
        .merge(admin::routes())
}

/// Patient id from a request body; absent and malformed ids are both 400
pub(crate) fn require_patient_id(raw: Option<&str>) -> QueueResult<PatientId> {
    match raw.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.parse(),
        None => Err(QueueError::Validation("Missing patient ID".to_string())),
    }
}
