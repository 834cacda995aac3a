//! RoomSight Common Library
//!
//! This crate provides shared types and utilities for RoomSight sensor bridges:
//!
//! - [`telemetry`] - Sensor data model (`Measurement`, `Reading`)
//! - [`serialization`] - JSON payload encoding and decoding
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod serialization;
pub mod telemetry;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, MqttConfig, load_config, parse_config};
pub use error::{Error, Result};
pub use serialization::{decode, encode};
pub use telemetry::{Measurement, Reading, SEA_LEVEL_PRESSURE_HPA, current_timestamp_secs};

/// Initialize tracing with the given configuration.
///
/// Installs two sinks:
/// - a file sink at `config.log_file` receiving WARN and above, always
/// - a stdout sink filtered by `RUST_LOG` (or `config.level`), only when
///   `config.debug` is set, in `LogFormat::Text` or `LogFormat::Json`
///
/// # Example
///
/// ```ignore
/// use roomsight_common::{LoggingConfig, init_tracing};
///
/// let config = LoggingConfig {
///     debug: true,
///     ..Default::default()
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use std::fs::OpenOptions;
    use std::sync::Mutex;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .map_err(|e| {
            Error::Config(format!(
                "Failed to open log file '{}': {}",
                config.log_file.display(),
                e
            ))
        })?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(LevelFilter::WARN)
            .boxed(),
    );

    if config.debug {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

        let console = match config.format {
            LogFormat::Text => fmt::layer().with_filter(filter).boxed(),
            LogFormat::Json => fmt::layer().json().with_filter(filter).boxed(),
        };
        layers.push(console);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}
