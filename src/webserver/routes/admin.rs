/// Staff administration and aggregate statistics
use axum::{
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{
    arguments::is_debug_webserver_enabled,
    errors::QueueResult,
    logger::{self, LogTag},
    models::StaffId,
    store::{NewStaff, StaffUpdate},
    webserver::{
        state::AppState,
        utils::{success_ack, success_response, JsonBody},
    },
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/staff", get(list_staff))
        .route("/admin/create-staff", post(create_staff))
        .route("/admin/staff/:id", put(update_staff))
        .route("/admin/staff/:id/toggle", post(toggle_staff))
        .route("/admin/system-stats", get(system_stats))
}

/// GET /api/admin/staff
async fn list_staff(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.store.list_staff().await)
}

/// POST /api/admin/create-staff
async fn create_staff(
    State(state): State<Arc<AppState>>,
    JsonBody(form): JsonBody<NewStaff>,
) -> QueueResult<Response> {
    let member = state.store.create_staff(form).await?;
    if is_debug_webserver_enabled() {
        logger::debug(
            LogTag::Webserver,
            &format!("Created staff {} (id {})", member.username, member.id),
        );
    }
    Ok(success_ack())
}

/// PUT /api/admin/staff/:id
async fn update_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StaffId>,
    JsonBody(update): JsonBody<StaffUpdate>,
) -> QueueResult<Response> {
    state.store.update_staff(id, update).await?;
    Ok(success_ack())
}

/// POST /api/admin/staff/:id/toggle
async fn toggle_staff(
    State(state): State<Arc<AppState>>,
    Path(id): Path<StaffId>,
) -> QueueResult<Response> {
    state.store.toggle_staff(id).await?;
    Ok(success_ack())
}

/// GET /api/admin/system-stats
///
/// Unjittered; the jitter only applies to the live stream.
async fn system_stats(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.store.system_stats().await)
}
