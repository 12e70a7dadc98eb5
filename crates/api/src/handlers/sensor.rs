//! Handlers for the device-facing and dashboard-facing sensor endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use firewatch_core::{SensorState, SensorUpdate};

use crate::error::AppResult;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Response header reporting what happened to the alert for an update.
pub const ALERT_STATUS_HEADER: &str = "x-alert-status";

/// POST /update -- replace the stored reading.
///
/// Answers 200 once the reading is stored, whether or not the alert it may
/// trigger was delivered; the alert outcome is in [`ALERT_STATUS_HEADER`].
pub async fn update_reading(
    State(state): State<AppState>,
    payload: Result<Json<SensorUpdate>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(update) = payload?;

    let outcome = state.relay.ingest(update).await;

    Ok((
        [(ALERT_STATUS_HEADER, outcome.as_str())],
        Json(MessageResponse {
            message: "Data updated",
        }),
    ))
}

/// GET /status -- the latest reading.
pub async fn get_status(State(state): State<AppState>) -> Json<SensorState> {
    Json(state.relay.snapshot().await)
}
