/// Live status streams served as server-sent events
///
/// One spawned publisher per request; the publisher stops when the client
/// drops the response body.
use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::{
    arguments::is_debug_webserver_enabled,
    logger::{self, LogTag},
    models::StaffId,
    streams::{
        open_stream, DoctorQueueProducer, PatientStatusProducer, PharmacyQueueProducer,
        StreamConfig, SystemStatsProducer, WaitingPatientsProducer,
    },
    webserver::{state::AppState, utils::event_stream_response},
};

/// Create event stream routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events/patient/:id", get(patient_events))
        .route("/events/pharmacy-queue", get(pharmacy_queue_events))
        .route("/events/system-stats", get(system_stats_events))
        .route("/events/waiting-patients", get(waiting_patients_events))
        .route("/events/doctor/:doctor_id/queue", get(doctor_queue_events))
}

/// GET /api/events/patient/:id
///
/// Malformed ids are not rejected here; they resolve to the not-found frame.
async fn patient_events(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    if is_debug_webserver_enabled() {
        logger::debug(LogTag::Webserver, &format!("Patient stream requested for {}", id));
    }

    let producer = Arc::new(PatientStatusProducer::new(state.store.clone()));
    let config = StreamConfig::patient(&state.config.streams);
    event_stream_response(open_stream(producer, id, config))
}

/// GET /api/events/pharmacy-queue
async fn pharmacy_queue_events(State(state): State<Arc<AppState>>) -> Response {
    let producer = Arc::new(PharmacyQueueProducer::new(state.store.clone()));
    let config = StreamConfig::pharmacy_queue(&state.config.streams);
    event_stream_response(open_stream(producer, (), config))
}

/// GET /api/events/system-stats
async fn system_stats_events(State(state): State<Arc<AppState>>) -> Response {
    let producer = Arc::new(SystemStatsProducer::new(state.store.clone()));
    let config = StreamConfig::system_stats(&state.config.streams);
    event_stream_response(open_stream(producer, (), config))
}

/// GET /api/events/waiting-patients
async fn waiting_patients_events(State(state): State<Arc<AppState>>) -> Response {
    let producer = Arc::new(WaitingPatientsProducer::new(state.store.clone()));
    let config = StreamConfig::queue_view(&state.config.streams);
    event_stream_response(open_stream(producer, (), config))
}

/// GET /api/events/doctor/:doctor_id/queue
async fn doctor_queue_events(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<StaffId>,
) -> Response {
    let producer = Arc::new(DoctorQueueProducer::new(state.store.clone()));
    let config = StreamConfig::queue_view(&state.config.streams);
    event_stream_response(open_stream(producer, doctor_id, config))
}
