//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use mnemos_core::config::ObservabilityConfig;

/// Environment variable holding the filter directive, e.g.
/// `MNEMOS_LOG=mnemos_consolidation=debug,info`.
pub const LOG_ENV: &str = "MNEMOS_LOG";

static INIT: Once = Once::new();

/// Install a JSON subscriber filtered by `MNEMOS_LOG`, default `info`.
///
/// Idempotent. A subscriber installed elsewhere first wins.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    install(filter, true);
}

/// Install a JSON subscriber with an explicit filter (tests, embedding hosts).
pub fn init_tracing_with_filter(filter: &str) {
    install(EnvFilter::new(filter), true);
}

/// Install per `[observability]`. `MNEMOS_LOG` still takes precedence over
/// the configured level.
pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    install(filter, config.json);
}

fn install(filter: EnvFilter, json: bool) {
    INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true);
        let result = if json {
            builder
                .json()
                .with_file(true)
                .with_line_number(true)
                .try_init()
        } else {
            builder.try_init()
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "tracing subscriber already installed");
        }
    });
}
