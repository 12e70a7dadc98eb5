use std::sync::Arc;

use firewatch_core::StateRelay;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the relay is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Owner of the latest sensor reading and the alert dispatch.
    pub relay: Arc<StateRelay>,
}
