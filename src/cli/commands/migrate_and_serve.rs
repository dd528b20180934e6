use anyhow::Result;
use tracing::info;

use super::initdb::init_database;
use super::serve::serve;

/// Bring the schema up to date, then hand over to the regular server loop.
pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Applying database migrations before serving");
    init_database(database_url).await?;
    serve(database_url, bind_address).await
}
