use duelsweeper::{start_cleanup_task, RegistryConfig, SessionRegistry};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duelsweeper=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting duelsweeper game registry");

    let config = RegistryConfig::from_env();
    let registry = Arc::new(SessionRegistry::new(&config));

    // Transports attach to the registry; this host only keeps it swept
    let sweeper = tokio::spawn(start_cleanup_task(registry.clone(), config));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }

    sweeper.abort();
    info!(games = registry.session_count(), "Registry stopped");
}
