//! `firewatch-api` -- fire sensor relay server.
//!
//! Receives readings from the sensor device on `POST /update`, serves the
//! latest one on `GET /status`, and sends an SMS when the reading is
//! alarming. See [`ServerConfig::from_env`] and
//! [`firewatch_alerts::SmsConfig::from_env`] for the environment variables.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use firewatch_alerts::SmsNotifier;
use firewatch_core::StateRelay;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firewatch_api::config::ServerConfig;
use firewatch_api::router::build_app_router;
use firewatch_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "firewatch_api=debug,firewatch_core=debug,firewatch_alerts=debug,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid server configuration");
        std::process::exit(1);
    });
    tracing::info!(
        host = %config.host,
        port = config.port,
        alert_timeout_secs = config.alert_timeout_secs,
        alert_cooldown_secs = config.alert_cooldown_secs,
        "Loaded server configuration"
    );

    // --- Notifier ---
    let alert_timeout = Duration::from_secs(config.alert_timeout_secs);
    let notifier = SmsNotifier::from_env(alert_timeout).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build SMS client");
        std::process::exit(1);
    });

    // --- App state ---
    let relay = StateRelay::new(Arc::new(notifier))
        .with_alert_timeout(alert_timeout)
        .with_alert_cooldown(Duration::from_secs(config.alert_cooldown_secs));
    let state = AppState {
        relay: Arc::new(relay),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let ip: IpAddr = config.host.parse().unwrap_or_else(|e| {
        tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
        std::process::exit(1);
    });
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        });

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
