//! # Cardstack Server
//!
//! Loads configuration, connects to MySQL, loads the SQL statement
//! registry and serves the card REST surface until Ctrl+C or SIGTERM.

use anyhow::Context;
use cardstack_config::{AppConfig, ConfigLoader};
use cardstack_repository::{
    create_pool, CardDao, MySqlStatementExecutor, SqlStatementRegistry, StatementExecutor,
};
use cardstack_rest::{create_router, AppState};
use cardstack_server::{logging::init_logging, startup::print_startup_info};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            init_logging(&AppConfig::default().observability);
            error!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    info!("Starting Cardstack Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> anyhow::Result<AppConfig> {
    let loader = ConfigLoader::from_default_location()?;
    Ok(loader.get().await)
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let registry = SqlStatementRegistry::from_locations(&config.sql.statement_locations)
        .context("Failed to load SQL statements")?;
    let registry = Arc::new(registry);

    let db_pool = create_pool(&config.database).await?;

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let executor: Arc<dyn StatementExecutor> =
        Arc::new(MySqlStatementExecutor::new(db_pool.clone()));
    let card_dao = CardDao::for_cards(registry.clone(), executor)?;

    let app_state = AppState::new(Arc::new(card_dao)).with_database_pool(db_pool.clone());
    let router = create_router(app_state, &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    print_startup_info(&config, registry.len());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server error")?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
