//! Prediction simulator - client-side prediction with server reconciliation
//!
//! A predicting client advances an entity's position every tick and sends
//! each update to an authoritative server over a simulated latent channel.
//! The server recomputes the position independently and sends back a
//! correction when it disagrees; the client then rewrites the corrected tick
//! in its history and replays everything after it.

mod config;
mod sim;
mod util;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting prediction simulator");
    info!(
        tick_interval_ms = config.tick_interval.as_millis() as u64,
        client_speed = config.client_speed,
        server_speed = config.server_speed,
        server_delay_ms = config.server_delay.as_millis() as u64,
        "Simulation parameters"
    );

    let (mut session, server) = sim::build(&config);

    // The server runs on its own task; updates reach it through the latent
    // uplink channel.
    tokio::spawn(server.run());

    session.bootstrap();

    // The session runs until externally terminated.
    tokio::select! {
        _ = session.run() => {}
        _ = shutdown_signal() => {
            info!("Shutting down");
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Termination signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
