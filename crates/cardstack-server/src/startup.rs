//! Server startup utilities.

use cardstack_config::AppConfig;
use tracing::info;

/// Logs where the server listens and what it loaded.
pub fn print_startup_info(config: &AppConfig, statement_count: usize) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("Cards:      http://{}/service/card", addr);
    info!("Health:     http://{}/health", addr);
    info!("Statements: {} loaded", statement_count);
    info!("{}", separator);
}
