//! Logging system initialization
//!
//! Console output plus an optional non-blocking log file, both filtered by
//! one `EnvFilter`. `RUST_LOG` replaces the configured level entirely.
//!
//! ```bash
//! # Show HTTP details
//! RUST_LOG="debug,reqwest=debug,hyper=debug" listing-harvester config.json
//! ```

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::{self, time::ChronoLocal};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use crate::infrastructure::config::LoggingConfig;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Dependency targets kept quiet unless trace is requested
const NOISY_TARGETS: [&str; 6] = ["hyper", "h2", "reqwest", "html5ever", "selectors", "tokio"];

/// Build the filter used when `RUST_LOG` is not set.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    if !config.level.to_lowercase().contains("trace") {
        for target in NOISY_TARGETS {
            filter = filter.add_directive(format!("{target}=warn").parse()?);
        }
    }

    for (target, level) in &config.module_filters {
        let directive = format!("{target}={level}");
        filter = filter.add_directive(
            directive
                .parse()
                .with_context(|| format!("Invalid module filter '{directive}'"))?,
        );
    }

    Ok(filter)
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file on drop and must be held for the
/// lifetime of the program.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_env_filter(config)?,
    };

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
            .with_target(false)
    });

    let mut guard = None;
    let file_layer = if config.file_output {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory {}", config.log_dir.display())
        })?;

        let appender = rolling::never(&config.log_dir, &config.file_name);
        let (writer, file_guard) = non_blocking(appender);
        guard = Some(file_guard);

        let layer = fmt::Layer::new()
            .with_writer(writer)
            .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
            .with_ansi(false);

        let layer = if config.json_format {
            layer
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            layer.with_target(false).boxed()
        };
        Some(layer)
    } else {
        None
    };

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

/// Log information about the running binary.
pub fn log_run_info() {
    info!("Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("OS: {}, arch: {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Run started at {}", chrono::Local::now().format(TIME_FORMAT));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config() {
        let mut config = LoggingConfig::default();
        config
            .module_filters
            .insert("listing_harvester::crawling".into(), "debug".into());

        let filter = build_env_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("hyper=warn"));
        assert!(rendered.contains("listing_harvester::crawling=debug"));
    }

    #[test]
    fn test_trace_level_keeps_dependencies() {
        let config = LoggingConfig {
            level: "trace".into(),
            ..LoggingConfig::default()
        };
        let rendered = build_env_filter(&config).unwrap().to_string();
        assert!(!rendered.contains("hyper=warn"));
    }

    #[test]
    fn test_invalid_module_filter_is_error() {
        let mut config = LoggingConfig::default();
        config.module_filters.insert("x".into(), "verbose".into());
        assert!(build_env_filter(&config).is_err());
    }
}
