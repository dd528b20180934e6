use anyhow::Result;
use sea_orm::Database;
use std::time::Duration;
use crate::probe::DEFAULT_PROBE_TIMEOUT;
use crate::schemas::AppState;

/// Initialize application state against the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        probe_timeout: probe_timeout_from_env(),
    })
}

/// Read the printer probe timeout override, falling back to the default
fn probe_timeout_from_env() -> Duration {
    std::env::var("PRINTER_PROBE_TIMEOUT_MS")
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_PROBE_TIMEOUT)
}
