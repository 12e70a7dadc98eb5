use axum::http::HeaderValue;

const SECONDS: &str = "a whole number of seconds";

/// An environment variable held a value that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{key} must be {expected}, got '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to a device on a
/// local network. SMS credentials are loaded separately by
/// [`firewatch_alerts::SmsConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `10000`).
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on a single alert delivery in seconds (default: `10`).
    pub alert_timeout_secs: u64,
    /// Minimum seconds between alerts; `0` disables the cooldown (default).
    pub alert_cooldown_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `10000`   |
    /// | `CORS_ORIGINS`         | `*`       |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `ALERT_TIMEOUT_SECS`   | `10`      |
    /// | `ALERT_COOLDOWN_SECS`  | `0`       |
    ///
    /// `ALERT_TIMEOUT_SECS` must be shorter than `REQUEST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => Vec::new(),
        };

        let request_timeout_secs = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30, SECONDS)?;
        let alert_timeout_secs = parse_var(&lookup, "ALERT_TIMEOUT_SECS", 10, SECONDS)?;

        // The alert runs inside the request; a slower alert would turn an
        // already-stored update into a 408.
        if alert_timeout_secs >= request_timeout_secs {
            return Err(ConfigError {
                key: "ALERT_TIMEOUT_SECS",
                expected: "shorter than REQUEST_TIMEOUT_SECS",
                value: alert_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            host,
            port: parse_var(&lookup, "PORT", 10000, "a valid port number")?,
            cors_origins,
            request_timeout_secs,
            alert_timeout_secs,
            alert_cooldown_secs: parse_var(&lookup, "ALERT_COOLDOWN_SECS", 0, SECONDS)?,
        })
    }
}

fn parse_var<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
            key,
            expected,
            value: raw.clone(),
        }),
    }
}

/// Parse a comma-separated origin list. `*` anywhere in the list means any origin.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    let entries: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if entries.contains(&"*") {
        return Ok(Vec::new());
    }

    entries
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError {
                key: "CORS_ORIGINS",
                expected: "a comma-separated list of origins",
                value: origin.to_string(),
            })
        })
        .collect()
}
