//! The process-wide sensor record and its ingest/snapshot operations.
//!
//! [`StateRelay`] owns the single [`SensorState`] behind a `RwLock`. Ingest
//! swaps the whole record under the write lock, then releases it before
//! calling the [`Notifier`], so a slow provider never blocks readers or
//! other writers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::NotifyError;
use crate::notifier::Notifier;
use crate::sensor::{SensorState, SensorUpdate};
use crate::types::Timestamp;

/// Default upper bound on a single alert delivery.
pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened to the alert side effect of an ingest.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertOutcome {
    /// The reading was below the threshold and no flame was reported.
    NotTriggered,
    /// The notifier accepted the alert.
    Sent,
    /// An alert was due but fell inside the cooldown window.
    Suppressed,
    /// An alert was due and could not be delivered.
    Failed(NotifyError),
}

impl AlertOutcome {
    /// Short label used in the `x-alert-status` response header.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertOutcome::NotTriggered => "none",
            AlertOutcome::Sent => "sent",
            AlertOutcome::Suppressed => "suppressed",
            AlertOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Default)]
struct Record {
    state: SensorState,
    updated_at: Option<Timestamp>,
    last_alert: Option<Instant>,
}

impl Record {
    /// Take the alert slot unless the previous alert is still within `cooldown`.
    fn claim_alert(&mut self, cooldown: Duration, now: Instant) -> bool {
        if let Some(last) = self.last_alert {
            if now.duration_since(last) < cooldown {
                return false;
            }
        }
        self.last_alert = Some(now);
        true
    }
}

/// Owner of the latest sensor reading.
///
/// Designed to be wrapped in `Arc` and shared with every request handler.
pub struct StateRelay {
    record: RwLock<Record>,
    notifier: Arc<dyn Notifier>,
    alert_timeout: Duration,
    alert_cooldown: Duration,
}

impl StateRelay {
    /// Create a relay holding the default reading (0 °C, no flame).
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            record: RwLock::new(Record::default()),
            notifier,
            alert_timeout: DEFAULT_ALERT_TIMEOUT,
            alert_cooldown: Duration::ZERO,
        }
    }

    /// Bound each alert delivery; an elapsed timeout is reported as
    /// [`NotifyError::Timeout`].
    pub fn with_alert_timeout(mut self, timeout: Duration) -> Self {
        self.alert_timeout = timeout;
        self
    }

    /// Suppress alerts for `cooldown` after each alert attempt.
    /// Zero (the default) alerts on every alarming reading.
    pub fn with_alert_cooldown(mut self, cooldown: Duration) -> Self {
        self.alert_cooldown = cooldown;
        self
    }

    /// Replace the stored reading with `update` and alert if it is alarming.
    ///
    /// The new reading is stored before any notification is attempted and
    /// stays stored whatever the outcome.
    pub async fn ingest(&self, update: SensorUpdate) -> AlertOutcome {
        let state = update.into_state();

        let alert_claimed = {
            let mut record = self.record.write().await;
            record.state = state;
            record.updated_at = Some(Utc::now());
            state
                .requires_alert()
                .then(|| record.claim_alert(self.alert_cooldown, Instant::now()))
        };

        tracing::info!(
            temperature = state.temperature,
            fire = state.fire_detected,
            "Sensor reading stored"
        );

        match alert_claimed {
            None => AlertOutcome::NotTriggered,
            Some(false) => {
                tracing::debug!(
                    cooldown_secs = self.alert_cooldown.as_secs(),
                    "Alert suppressed by cooldown"
                );
                AlertOutcome::Suppressed
            }
            Some(true) => self.dispatch_alert(&state).await,
        }
    }

    /// The current reading.
    pub async fn snapshot(&self) -> SensorState {
        self.record.read().await.state
    }

    /// When the last reading was ingested, if any has been.
    pub async fn last_updated(&self) -> Option<Timestamp> {
        self.record.read().await.updated_at
    }

    /// Whether the configured notifier can deliver alerts.
    pub fn notifier_ready(&self) -> bool {
        self.notifier.is_ready()
    }

    async fn dispatch_alert(&self, state: &SensorState) -> AlertOutcome {
        let message = state.alert_message();
        tracing::warn!(
            temperature = state.temperature,
            fire = state.fire_detected,
            "Alert condition met, notifying"
        );

        let result = tokio::time::timeout(self.alert_timeout, self.notifier.send(&message))
            .await
            .unwrap_or(Err(NotifyError::Timeout(self.alert_timeout)));

        match result {
            Ok(()) => {
                tracing::info!("Alert delivered");
                AlertOutcome::Sent
            }
            Err(e) => {
                tracing::error!(error = %e, "Alert delivery failed");
                AlertOutcome::Failed(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
