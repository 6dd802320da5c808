use chrono::Utc;
use std::sync::Arc;
use tokio::time::interval;
use tracing::{debug, info, instrument};

use super::config::RegistryConfig;
use super::repository::SessionRegistry;

/// Starts the background task that periodically evicts idle games
#[instrument(skip(registry))]
pub async fn start_cleanup_task(registry: Arc<SessionRegistry>, config: RegistryConfig) {
    info!(
        sweep_interval_secs = config.sweep_interval.as_secs(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Starting idle game sweep task"
    );

    let mut sweep_interval = interval(config.sweep_interval);

    loop {
        sweep_interval.tick().await;
        run_sweep(&registry);
    }
}

fn run_sweep(registry: &SessionRegistry) -> usize {
    let evicted = registry.sweep(Utc::now());

    if evicted == 0 {
        debug!(remaining = registry.session_count(), "No idle games to evict");
    } else {
        info!(
            evicted = evicted,
            remaining = registry.session_count(),
            "Idle game sweep completed"
        );
    }
    evicted
}
