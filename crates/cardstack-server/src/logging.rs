//! Tracing subscriber setup.

use cardstack_config::ObservabilityConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},cardstack=debug,tower_http=debug",
            config.log_level
        ))
    })
}

/// Installs the global subscriber. Pretty or JSON output follows `log_format`.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(build_filter(config));

    if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_uses_configured_level() {
        std::env::remove_var("RUST_LOG");
        let config = ObservabilityConfig {
            log_level: "warn".to_string(),
            log_format: "json".to_string(),
        };
        let filter = build_filter(&config).to_string();
        assert!(filter.contains("warn"));
        assert!(filter.contains("cardstack=debug"));
    }
}
