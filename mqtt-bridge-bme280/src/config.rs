//! Configuration for the BME280 bridge.

use std::path::PathBuf;

use roomsight_bridge_framework::{
    BridgeConfig, ConfigError, LoggingConfig, MqttConfig, SamplerConfig, validate_common,
};
use serde::{Deserialize, Serialize};

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bme280BridgeConfig {
    /// MQTT broker settings.
    #[serde(default)]
    pub mqtt: MqttConfig,

    /// Sampling cadence and topic.
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Sensor bus settings.
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// I2C address of the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorAddress {
    /// 0x76 (SDO tied to GND).
    #[default]
    Primary,
    /// 0x77 (SDO tied to VDDIO).
    Secondary,
}

impl SensorAddress {
    pub fn as_u8(&self) -> u8 {
        match self {
            SensorAddress::Primary => 0x76,
            SensorAddress::Secondary => 0x77,
        }
    }
}

/// BME280 bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// I2C character device (default: "/dev/i2c-1").
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: PathBuf,

    /// Device address (default: primary).
    #[serde(default)]
    pub address: SensorAddress,
}

fn default_i2c_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            address: SensorAddress::default(),
        }
    }
}

impl BridgeConfig for Bme280BridgeConfig {
    fn mqtt(&self) -> &MqttConfig {
        &self.mqtt
    }

    fn mqtt_mut(&mut self) -> &mut MqttConfig {
        &mut self.mqtt
    }

    fn sampler(&self) -> &SamplerConfig {
        &self.sampler
    }

    fn sampler_mut(&mut self) -> &mut SamplerConfig {
        &mut self.sampler
    }

    fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    fn logging_mut(&mut self) -> &mut LoggingConfig {
        &mut self.logging
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_common(self)?;

        if self.sensor.i2c_bus.as_os_str().is_empty() {
            return Err(ConfigError::validation("sensor.i2c_bus must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Bme280BridgeConfig = json5::from_str("{}").unwrap();
        config.validate().unwrap();

        assert_eq!(config.mqtt.hostname, "localhost");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.sampler.frequency, 1);
        assert_eq!(config.sampler.topic, "sensors/indoor");
        assert_eq!(config.sampler.max_iterations, None);
        assert_eq!(config.sensor.i2c_bus, PathBuf::from("/dev/i2c-1"));
        assert_eq!(config.sensor.address, SensorAddress::Primary);
        assert_eq!(
            config.logging.log_file,
            PathBuf::from("warnings.log")
        );
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            mqtt: {
                hostname: "mqtt.home.arpa",
                port: 1884,
                client_id: "bme280-bedroom",
                keep_alive_secs: 60,
                publish_timeout_secs: 3
            },
            sampler: {
                frequency: 12,
                topic: "sensors/bedroom",
                max_iterations: 100
            },
            sensor: {
                i2c_bus: "/dev/i2c-0",
                address: "secondary"
            },
            logging: {
                level: "debug",
                format: "json",
                debug: true,
                log_file: "/var/log/roomsight/bme280.log"
            }
        }"#;

        let config: Bme280BridgeConfig = json5::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.mqtt.client_id, "bme280-bedroom");
        assert_eq!(config.mqtt.publish_timeout_secs, 3);
        assert_eq!(config.sampler.frequency, 12);
        assert_eq!(config.sampler.max_iterations, Some(100));
        assert_eq!(config.sensor.address.as_u8(), 0x77);
        assert!(config.logging.debug);
    }

    #[test]
    fn test_validate_frequency() {
        for freq in [0, 61, -1] {
            let json = format!("{{ sampler: {{ frequency: {freq} }} }}");
            let config: Bme280BridgeConfig = json5::from_str(&json).unwrap();
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidFrequency(f)) if f == freq
            ));
        }
    }

    #[test]
    fn test_validate_empty_bus() {
        let config: Bme280BridgeConfig =
            json5::from_str(r#"{ sensor: { i2c_bus: "" } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config: Bme280BridgeConfig =
            json5::from_str(include_str!("../bme280.json5")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.sampler.topic, "sensors/indoor");
    }
}
