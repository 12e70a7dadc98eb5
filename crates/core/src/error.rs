use std::time::Duration;

/// Domain-level error raised while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The incoming reading was malformed.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure to deliver an alert through a [`Notifier`](crate::Notifier).
///
/// Never fatal: the reading that triggered the alert is already stored by
/// the time any of these is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotifyError {
    /// Provider credentials are missing; names the first absent setting.
    #[error("Notifier is not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The provider rejected the message or could not be reached.
    #[error("Alert delivery failed: {0}")]
    Delivery(String),

    /// The provider did not answer within the alert timeout.
    #[error("Alert delivery timed out after {0:?}")]
    Timeout(Duration),
}
