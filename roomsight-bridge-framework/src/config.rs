//! Configuration traits and utilities.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::args::BridgeArgs;
use crate::error::ConfigError;
use crate::publisher::QoS;
use crate::runner::LoopConfig;
use crate::{LoggingConfig, MqttConfig};

/// Sampling cadence and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Readings published per minute, 1 to 60 (default: 1).
    #[serde(default = "default_frequency")]
    pub frequency: i64,

    /// MQTT topic (default: "sensors/indoor").
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Stop after this many ticks (default: run forever).
    #[serde(default)]
    pub max_iterations: Option<u64>,
}

fn default_frequency() -> i64 {
    1
}

fn default_topic() -> String {
    "sensors/indoor".to_string()
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            topic: default_topic(),
            max_iterations: None,
        }
    }
}

impl SamplerConfig {
    /// Build the loop configuration. Readings are published at QoS 1.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig::new(self.frequency, self.topic.clone())
            .with_max_iterations(self.max_iterations)
            .with_qos(QoS::AtLeastOnce)
    }
}

/// Trait for bridge configuration types.
///
/// Implement this trait for your bridge's configuration struct to get
/// automatic loading, CLI overrides, validation, and access to common
/// config fields.
///
/// # Example
///
/// ```ignore
/// use serde::Deserialize;
/// use roomsight_bridge_framework::{BridgeConfig, LoggingConfig, MqttConfig, SamplerConfig};
///
/// #[derive(Debug, Default, Deserialize)]
/// pub struct MyBridgeConfig {
///     #[serde(default)]
///     pub mqtt: MqttConfig,
///     #[serde(default)]
///     pub sampler: SamplerConfig,
///     #[serde(default)]
///     pub logging: LoggingConfig,
/// }
///
/// impl BridgeConfig for MyBridgeConfig {
///     fn mqtt(&self) -> &MqttConfig { &self.mqtt }
///     fn mqtt_mut(&mut self) -> &mut MqttConfig { &mut self.mqtt }
///     fn sampler(&self) -> &SamplerConfig { &self.sampler }
///     fn sampler_mut(&mut self) -> &mut SamplerConfig { &mut self.sampler }
///     fn logging(&self) -> &LoggingConfig { &self.logging }
///     fn logging_mut(&mut self) -> &mut LoggingConfig { &mut self.logging }
/// }
/// ```
pub trait BridgeConfig: Sized + Default + DeserializeOwned {
    /// Get the MQTT broker configuration.
    fn mqtt(&self) -> &MqttConfig;

    fn mqtt_mut(&mut self) -> &mut MqttConfig;

    /// Get the sampling configuration.
    fn sampler(&self) -> &SamplerConfig;

    fn sampler_mut(&mut self) -> &mut SamplerConfig;

    /// Get the logging configuration.
    fn logging(&self) -> &LoggingConfig;

    fn logging_mut(&mut self) -> &mut LoggingConfig;

    /// Validate the configuration.
    ///
    /// Called automatically after loading. Override to add custom validation,
    /// calling [`validate_common`] to keep the shared checks.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_common(self)
    }

    /// Load configuration from a file path.
    ///
    /// Supports JSON5 format. Calls [`validate`](Self::validate) after loading.
    fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from CLI arguments.
    ///
    /// Starts from the `--config` file when given (defaults otherwise),
    /// applies explicit flags on top, then validates.
    fn from_args(args: &BridgeArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::read(path)?,
            None => Self::default(),
        };

        args.apply_mqtt(config.mqtt_mut());
        args.apply_sampler(config.sampler_mut());
        args.apply_logging(config.logging_mut());

        config.validate()?;
        Ok(config)
    }

    #[doc(hidden)]
    fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Ok(json5::from_str(&content)?)
    }
}

/// Checks shared by every bridge configuration.
pub fn validate_common<C: BridgeConfig>(config: &C) -> Result<(), ConfigError> {
    config.sampler().loop_config().validate()?;

    let mqtt = config.mqtt();
    if mqtt.hostname.is_empty() {
        return Err(ConfigError::validation("mqtt.hostname must not be empty"));
    }
    if mqtt.client_id.is_empty() || mqtt.client_id.starts_with(' ') {
        return Err(ConfigError::validation(
            "mqtt.client_id must be non-empty and not start with a space",
        ));
    }
    if mqtt.publish_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "mqtt.publish_timeout_secs must be > 0",
        ));
    }

    Ok(())
}
