//! Observability utilities.

use crate::types::ObservabilityConfig;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Environment switch for JSON log output.
pub const LOG_FORMAT_ENV: &str = "PAYMENT_TOOLS_LOG_FORMAT";

/// Initialize tracing subscriber once for the process.
///
/// Log format defaults to plain text and can be switched to JSON via
/// `PAYMENT_TOOLS_LOG_FORMAT=json`. Filter defaults to `info` if `RUST_LOG` is unset.
pub fn init_tracing() {
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    install("info", json);
}

/// Like [`init_tracing`], with level and format taken from config.
///
/// `RUST_LOG` still wins over the configured level when set.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    install(&config.log_level, config.json_logs);
}

fn install(default_level: &str, json: bool) {
    TRACING_INIT.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let result = if json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .try_init()
        };

        if let Err(err) = result {
            eprintln!("tracing init skipped: {err}");
        }
    });
}
