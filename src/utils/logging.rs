use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Binaries log under their own crate name, so `ingest` needs its own directive.
fn default_directives(level: &str) -> String {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let lvl = level.as_str().to_lowercase();
    format!("bitcoin_snapshots={lvl},ingest={lvl},tower_http={lvl}")
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into())
}

/// Initialize logging based on configuration. `RUST_LOG` overrides the level.
pub fn init_logging(settings: &LoggingSettings) {
    match settings.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter(&settings.level))
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter(&settings.level))
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter(&settings.level))
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
    }

    info!("Logging initialized with level: {}, format: {}", settings.level, settings.format);
}
