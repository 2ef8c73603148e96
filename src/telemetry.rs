//! Logging setup
//!
//! `FERROSCAN_LOG` takes an `EnvFilter` directive (e.g. "debug" or
//! "info,ferroscan=debug"), falling back to `RUST_LOG` and then to the
//! configured default. `FERROSCAN_LOG_FORMAT=json` switches to JSON lines.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level filter (default: "info")
    pub default_level: String,
    /// Use JSON format for logs (default: false)
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_env("FERROSCAN_LOG")
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(&config.default_level));

    let use_json = std::env::var("FERROSCAN_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(config.json_format);

    let registry = tracing_subscriber::registry().with(env_filter);
    if use_json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()?;
    }

    Ok(())
}
