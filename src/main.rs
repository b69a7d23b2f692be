use dotenvy::dotenv;
use superandes::config::{self, load_table_names};
use superandes::db;
use superandes::errors::Result;
use superandes::store::SuperAndes;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal: env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Table-name mapping; falls back to defaults with a logged warning
    let tables = load_table_names(&config::tables_config_path());
    info!("Table-name configuration loaded.");

    // 4. Initialize the database (creates the schema and the id sequence)
    let db_path = config::database_path();
    let pool = db::init_db(&db_path, &tables)
        .await
        .inspect(|_| info!("Database initialized at '{}'.", db_path))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    let store = SuperAndes::new(pool, tables);

    // Smoke query so a fresh deployment fails loudly instead of on first use
    let supermarkets = store
        .list_supermarkets()
        .await
        .inspect_err(|e| error!("Failed to query supermarkets: {}", e))?;
    info!(
        "SuperAndes store ready: {} supermarket(s) registered.",
        supermarkets.len()
    );

    Ok(())
}
