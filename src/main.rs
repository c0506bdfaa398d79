use anyhow::Result;
use sales_analytics::{
    analytics::{Clock, SystemClock},
    api::{self, AppState},
    config::Config,
    database::{DatabaseConnection, InMemoryStore, SalesRepository, SalesStore},
    service::{SellerService, TransactionService},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting sales analytics service");

    let mut database = None;
    let store: Arc<dyn SalesStore> = if config.database.is_in_memory() {
        warn!("Using in-memory store, data will not survive a restart");
        Arc::new(InMemoryStore::new())
    } else {
        let connection = DatabaseConnection::new(&config.database).await.map_err(|e| {
            error!("Failed to initialize database: {}", e);
            e
        })?;
        connection.run_migrations().await?;
        let repository = SalesRepository::new(connection.pool().clone());
        database = Some(connection);
        Arc::new(repository)
    };
    store.health_check().await?;
    info!("Storage backend ready: {}", store.name());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = Arc::new(AppState {
        sellers: SellerService::new(store.clone(), clock.clone(), config.analytics.clone()),
        transactions: TransactionService::new(store, clock),
    });

    let addr = config.server.socket_addr()?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = api::serve(addr, state, shutdown).await {
        error!("HTTP server error: {}", e);
    }

    if let Some(connection) = database {
        connection.close().await;
    }

    info!("Sales analytics service shutdown complete");
    Ok(())
}
