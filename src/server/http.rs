//! HTTP surface
//!
//! Routes:
//! - `POST /push/{camera_id}` - producer pushes raw JPEG bytes
//! - `GET /stream/{camera_id}` - unbounded MJPEG stream for one consumer
//! - `GET /health` - JSON liveness report for all known cameras
//! - `GET /` - HTML viewer page
//!
//! Producers and consumers never meet in memory: a push handler returns as
//! soon as the slot is published, and each stream handler spawns its own
//! watcher task that picks the frame up from the store.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};

use crate::status::{SourceStatus, StatusTracker};
use crate::store::{FrameStore, SourceId, StoreError};
use crate::stream::{multipart, FrameWatcher};

/// Pushed frames larger than this are rejected outright
const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Frames buffered per consumer before its watcher pauses
///
/// Deliberately tiny: a consumer that cannot keep up delays only its own
/// watcher, and there is no history worth buffering anyway.
const STREAM_CHANNEL_CAPACITY: usize = 2;

/// Shared state for all request handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FrameStore>,
    pub tracker: Arc<StatusTracker>,
    pub poll_interval: Duration,
}

/// Health report payload
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub camera_count: usize,
    pub cameras: Vec<SourceStatus>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/push/{camera_id}", post(push_frame))
        .route("/stream/{camera_id}", get(stream_frames))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_FRAME_BYTES))
        .with_state(state)
}

/// Producer endpoint: store the newest frame for a camera
async fn push_frame(
    Path(camera_id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let id = SourceId::new(camera_id);

    match state.store.write(&id, body).await {
        Ok(()) => {
            state.tracker.record_write(&id).await;
            (StatusCode::OK, "ok").into_response()
        }
        Err(StoreError::EmptyPayload) => (StatusCode::BAD_REQUEST, "no data").into_response(),
        Err(e) => {
            tracing::error!(camera = %id, error = %e, "Failed to store pushed frame");
            (StatusCode::INTERNAL_SERVER_ERROR, "error").into_response()
        }
    }
}

/// Consumer endpoint: unbounded MJPEG stream for one camera
///
/// Spawns a watcher task bound to this connection; dropping the response
/// body closes the channel and the watcher exits within one poll interval.
async fn stream_frames(
    Path(camera_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, StatusCode> {
    let id = SourceId::new(camera_id);
    tracing::info!(camera = %id, "Stream consumer connected");

    let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
    let watcher = FrameWatcher::new(Arc::clone(&state.store), id)
        .with_poll_interval(state.poll_interval);
    tokio::spawn(watcher.run(tx));

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<Bytes, Infallible>));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, multipart::STREAM_CONTENT_TYPE)
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Liveness report for every camera with an existing slot
async fn health(State(state): State<AppState>) -> Result<Json<HealthReport>, StatusCode> {
    let camera_ids = state.store.list_identifiers().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list frame slots");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let cameras = state.tracker.all_statuses(&camera_ids).await;

    Ok(Json(HealthReport {
        status: "ok",
        camera_count: cameras.len(),
        cameras,
    }))
}

/// Minimal browser viewer
async fn index() -> Html<&'static str> {
    Html(super::viewer::VIEWER_HTML)
}
