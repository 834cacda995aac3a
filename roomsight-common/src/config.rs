use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// MQTT broker connection configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MqttConfig {
    /// Broker hostname or IP address.
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Broker TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// MQTT client identifier. Defaults to `roomsight-<pid>`.
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Keep-alive interval announced to the broker, in seconds.
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,

    /// Upper bound for a single connect/publish/ack exchange, in seconds.
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    format!("roomsight-{}", std::process::id())
}

fn default_keep_alive() -> u64 {
    30
}

fn default_publish_timeout() -> u64 {
    10
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            port: default_port(),
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive(),
            publish_timeout_secs: default_publish_timeout(),
        }
    }
}

/// Log output format for the console sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
///
/// Warnings and errors always go to `log_file`. The console sink is only
/// installed when `debug` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Console log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,

    /// Enable the console sink.
    #[serde(default)]
    pub debug: bool,

    /// File receiving WARN and above.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("warnings.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            debug: false,
            log_file: default_log_file(),
        }
    }
}

/// Load a configuration file in JSON5 format.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    json5::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Load a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(content: &str) -> Result<T> {
    json5::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}
