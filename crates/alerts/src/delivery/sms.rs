//! SMS alert delivery via the Twilio Messages API.
//!
//! [`SmsNotifier`] posts the alert text as a form-encoded message to
//! `{api_base}/2010-04-01/Accounts/{sid}/Messages.json`. Credentials are read
//! once at startup; when any of them is missing the notifier is still
//! constructed, and the gap is reported each time an alert is attempted.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use firewatch_core::error::NotifyError;
use firewatch_core::Notifier;

/// Default Twilio REST endpoint.
const DEFAULT_API_BASE: &str = "https://api.twilio.com";

const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
const ENV_FROM_NUMBER: &str = "TWILIO_FROM_NUMBER";
const ENV_TO_NUMBER: &str = "ALERT_TO_NUMBER";
const ENV_API_BASE: &str = "TWILIO_API_BASE";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A required SMS setting is absent (or empty).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not set")]
pub struct SmsConfigError(pub &'static str);

/// Error type for a single SMS delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The underlying HTTP request failed (network, DNS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider did not answer within the client timeout.
    #[error("SMS request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a non-2xx status.
    #[error("SMS provider returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

impl From<SmsError> for NotifyError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::Timeout(after) => NotifyError::Timeout(after),
            other => NotifyError::Delivery(other.to_string()),
        }
    }
}

/// Error body returned by Twilio on rejected requests.
#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

// ---------------------------------------------------------------------------
// SmsConfig
// ---------------------------------------------------------------------------

/// Credentials and addressing for SMS delivery.
#[derive(Clone)]
pub struct SmsConfig {
    /// Twilio account SID, also the basic-auth user.
    pub account_sid: String,
    /// Twilio auth token, the basic-auth password.
    pub auth_token: String,
    /// Sender phone number (E.164).
    pub from_number: String,
    /// Recipient phone number (E.164).
    pub to_number: String,
    /// REST endpoint root, without trailing slash.
    pub api_base: String,
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl SmsConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default                  |
    /// |----------------------|----------|--------------------------|
    /// | `TWILIO_ACCOUNT_SID` | yes      | -                        |
    /// | `TWILIO_AUTH_TOKEN`  | yes      | -                        |
    /// | `TWILIO_FROM_NUMBER` | yes      | -                        |
    /// | `ALERT_TO_NUMBER`    | yes      | -                        |
    /// | `TWILIO_API_BASE`    | no       | `https://api.twilio.com` |
    pub fn from_env() -> Result<Self, SmsConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Returns the first required key that is missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SmsConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SmsConfigError(key))
        };

        Ok(Self {
            account_sid: required(ENV_ACCOUNT_SID)?,
            auth_token: required(ENV_AUTH_TOKEN)?,
            from_number: required(ENV_FROM_NUMBER)?,
            to_number: required(ENV_TO_NUMBER)?,
            api_base: lookup(ENV_API_BASE)
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.account_sid
        )
    }
}

// ---------------------------------------------------------------------------
// SmsNotifier
// ---------------------------------------------------------------------------

/// Sends fire alerts as text messages.
pub struct SmsNotifier {
    client: reqwest::Client,
    config: Result<SmsConfig, SmsConfigError>,
    timeout: Duration,
}

impl SmsNotifier {
    /// Create a notifier from an already-loaded configuration.
    ///
    /// A configuration error is kept and surfaced on every [`send`](Notifier::send).
    /// `timeout` bounds each HTTP request; pass the same value the caller
    /// waits on so an elapsed request reads as a timeout.
    pub fn new(
        config: Result<SmsConfig, SmsConfigError>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            config,
            timeout,
        })
    }

    /// Create a notifier from environment variables, warning when incomplete.
    pub fn from_env(timeout: Duration) -> Result<Self, reqwest::Error> {
        let config = SmsConfig::from_env();
        match &config {
            Ok(c) => tracing::info!(to = %c.to_number, "SMS alerts enabled"),
            Err(e) => tracing::warn!(error = %e, "SMS alerts not configured; alerts will fail"),
        }
        Self::new(config, timeout)
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, config: &SmsConfig, message: &str) -> Result<(), SmsError> {
        let response = self
            .client
            .post(config.messages_url())
            .basic_auth(&config.account_sid, Some(&config.auth_token))
            .form(&[
                ("To", config.to_number.as_str()),
                ("From", config.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderError>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(SmsError::HttpStatus {
            status: status.as_u16(),
            message,
        })
    }

    fn request_error(&self, err: reqwest::Error) -> SmsError {
        if err.is_timeout() {
            SmsError::Timeout(self.timeout)
        } else {
            SmsError::Request(err)
        }
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let config = self
            .config
            .as_ref()
            .map_err(|e| NotifyError::NotConfigured(e.0))?;

        self.try_send(config, message).await?;
        tracing::debug!(to = %config.to_number, "SMS alert accepted by provider");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.config.is_ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
