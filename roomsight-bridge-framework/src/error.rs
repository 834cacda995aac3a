//! Error types for the bridge framework.
//!
//! Failures fall into three kinds:
//! - [`ConfigError`]: bad configuration or missing credentials, fatal before the loop starts
//! - [`SensorError`]: hardware or driver failure, fatal
//! - [`PublishError`]: broker or transport failure, recoverable per tick

use thiserror::Error;

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Publish frequency outside 1..=60 per minute.
    #[error("Frequency must be between 1 and 60 messages per minute, got {0}")]
    InvalidFrequency(i64),

    /// Topic is empty.
    #[error("MQTT topic must not be empty")]
    EmptyTopic,

    /// One or more credential variables are unset or empty.
    #[error(
        "MQTT authentication parameters not defined: {} must be set in the environment or '.env'",
        .missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    /// Configuration file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    /// Configuration parse error.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// Configuration validation error.
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl ConfigError {
    /// Create a configuration validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<json5::Error> for ConfigError {
    fn from(err: json5::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Sensor errors.
#[derive(Error, Debug)]
pub enum SensorError {
    /// The device could not be opened or initialized.
    #[error("Sensor initialization failed: {0}")]
    Init(String),

    /// A measurement could not be taken.
    #[error("Sensor read failed: {0}")]
    Read(String),

    /// The driver is not available on this platform.
    #[error("Sensor not supported: {0}")]
    Unsupported(String),
}

/// Publish errors.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Broker unreachable or transport failure.
    #[error("MQTT connection error: {0}")]
    Connection(String),

    /// Broker rejected the connection (bad credentials, not authorized, ...).
    #[error("MQTT broker refused connection: {0}")]
    Refused(String),

    /// The client request queue rejected the message.
    #[error("MQTT client error: {0}")]
    Client(String),

    /// No acknowledgement within the configured bound.
    #[error("MQTT publish timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The reading could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors that can occur in a bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Publish(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_names_variables() {
        let err = ConfigError::MissingCredentials {
            missing: vec!["MQTT_USER", "MQTT_PASSWORD"],
        };
        let msg = err.to_string();
        assert!(msg.contains("MQTT_USER, MQTT_PASSWORD"), "got: {msg}");
    }

    #[test]
    fn test_invalid_frequency_message() {
        let msg = ConfigError::InvalidFrequency(61).to_string();
        assert!(msg.starts_with("Frequency must be between 1 and 60"));
        assert!(msg.ends_with("61"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(BridgeError::from(ConfigError::EmptyTopic).is_fatal());
        assert!(BridgeError::from(SensorError::Read("i2c nack".into())).is_fatal());
        assert!(!BridgeError::from(PublishError::Timeout { secs: 10 }).is_fatal());
    }

    #[test]
    fn test_transparent_display() {
        let err = BridgeError::from(SensorError::Init("no device at 0x76".into()));
        assert_eq!(
            err.to_string(),
            "Sensor initialization failed: no device at 0x76"
        );
    }
}
