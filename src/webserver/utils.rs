/// Response helpers shared by all route modules
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::convert::Infallible;

use crate::errors::QueueError;
use crate::logger::{self, LogTag};
use crate::streams::FrameStream;

/// JSON request body whose rejections use the error envelope
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueueError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

impl From<JsonRejection> for QueueError {
    fn from(rejection: JsonRejection) -> Self {
        QueueError::Validation(rejection.body_text())
    }
}

/// 200 with the value as the whole JSON body
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// 200 with `{"success": true}` merged into the given object
pub fn success_with(fields: Value) -> Response {
    let mut body = json!({ "success": true });
    if let (Some(body), Value::Object(fields)) = (body.as_object_mut(), fields) {
        body.extend(fields);
    }
    (StatusCode::OK, Json(body)).into_response()
}

pub fn success_ack() -> Response {
    success_with(Value::Null)
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

pub fn status_for(err: &QueueError) -> StatusCode {
    match err {
        QueueError::NotFound(_) => StatusCode::NOT_FOUND,
        QueueError::Forbidden(_) => StatusCode::FORBIDDEN,
        QueueError::Validation(_) | QueueError::Conflict(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for QueueError {
    fn into_response(self) -> Response {
        if !self.is_client_error() {
            logger::error(LogTag::Api, &format!("Request failed: {}", self));
        }
        error_response(status_for(&self), &self.to_string())
    }
}

/// Wrap a frame stream as a `text/event-stream` response
pub fn event_stream_response(frames: FrameStream) -> Response {
    let body = Body::from_stream(frames.map(Ok::<_, Infallible>));
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(status_for(&QueueError::patient_not_found()), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(&QueueError::Forbidden("Patient not assigned to you".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_for(&QueueError::missing_fields()), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&QueueError::Conflict("taken".into())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&QueueError::Server("bind".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
