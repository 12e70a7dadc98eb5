//! The outbound alert capability.

use async_trait::async_trait;

use crate::error::NotifyError;

/// Delivers an alert message to a person through some external channel.
///
/// Implementations must be cheap to share (`Arc<dyn Notifier>`) and safe to
/// call concurrently.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver `message` once.
    async fn send(&self, message: &str) -> Result<(), NotifyError>;

    /// Whether the notifier has what it needs to deliver (e.g. credentials).
    fn is_ready(&self) -> bool {
        true
    }
}
