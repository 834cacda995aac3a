//! RoomSight Bridge Framework
//!
//! Common abstractions for building bridges that sample a sensor and publish
//! readings to an MQTT broker.
//!
//! # Overview
//!
//! This framework provides:
//! - [`SamplingLoop`] for the read/publish/sleep cycle with per-tick error containment
//! - [`Sensor`] and [`Clock`] capabilities consumed by the loop
//! - [`Publisher`] capability and its MQTT implementation [`MqttPublisher`]
//! - [`CredentialSource`] for broker credentials ([`EnvCredentialSource`] reads `MQTT_USER`/`MQTT_PASSWORD`)
//! - [`BridgeConfig`] trait for configuration loading, CLI overrides and validation
//! - [`BridgeArgs`] for common CLI argument parsing
//!
//! # Example
//!
//! ```ignore
//! use roomsight_bridge_framework::{
//!     BridgeArgs, BridgeConfig, CredentialSource, EnvCredentialSource, MqttPublisher,
//!     SamplingLoop, shutdown_on_ctrl_c,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = BridgeArgs::parse();
//!     let config = MyBridgeConfig::from_args(&args)?;
//!     let credentials = EnvCredentialSource::from_env().load()?;
//!
//!     let publisher = MqttPublisher::new(config.mqtt().clone(), credentials);
//!     let sampler = SamplingLoop::new(my_sensor()?, publisher, config.sampler().loop_config())?;
//!
//!     // Run until max iterations or Ctrl+C
//!     sampler.run(shutdown_on_ctrl_c()).await?;
//!     Ok(())
//! }
//! ```

mod args;
mod config;
mod credentials;
mod error;
mod publisher;
mod runner;
mod sensor;

pub use args::BridgeArgs;
pub use config::{BridgeConfig, SamplerConfig, validate_common};
pub use credentials::{
    CredentialSource, Credentials, EnvCredentialSource, PASSWORD_VAR, USER_VAR,
};
pub use error::{BridgeError, ConfigError, PublishError, Result, SensorError};
pub use publisher::{MqttPublisher, Publisher, QoS};
pub use runner::{
    LoopConfig, LoopStats, MAX_FREQUENCY, MIN_FREQUENCY, SamplingLoop, shutdown_on_ctrl_c,
};
pub use sensor::{Clock, FixedClock, Sensor, SystemClock};

// Re-export commonly used types from roomsight-common
pub use roomsight_common::{LogFormat, LoggingConfig, Measurement, MqttConfig, Reading};
pub use tokio_util::sync::CancellationToken;
