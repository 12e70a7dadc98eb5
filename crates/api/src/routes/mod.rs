pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the sensor route tree, mounted at the root.
///
/// ```text
/// /update     store a reading from the device (POST)
/// /status     latest reading for dashboards (GET)
/// ```
pub fn sensor_routes() -> Router<AppState> {
    Router::new()
        .route("/update", post(handlers::sensor::update_reading))
        .route("/status", get(handlers::sensor::get_status))
}
