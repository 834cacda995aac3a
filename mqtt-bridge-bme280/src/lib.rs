//! MQTT bridge for a BME280 environmental sensor.
//!
//! This bridge reads temperature and humidity from a BME280 over I2C at a
//! fixed cadence and publishes each reading as JSON to an MQTT broker.
//!
//! # Payload
//!
//! ```text
//! {"ts":1712345678125.0,"temperature":22.5,"humidity":45.0}
//! ```
//!
//! `ts` is milliseconds since the Unix epoch. Readings go to the configured
//! topic (default `sensors/indoor`) at QoS 1.

pub mod config;
pub mod sensor;

use roomsight_bridge_framework::{
    BridgeConfig, CancellationToken, CredentialSource, LoopStats, MqttPublisher, Result,
    SamplingLoop,
};

use crate::config::Bme280BridgeConfig;
use crate::sensor::Bme280Sensor;

/// Load credentials, open the sensor and run the sampling loop.
///
/// Credentials are checked before the sensor is touched. Returns when the
/// configured number of readings was published or `shutdown` is cancelled.
pub async fn run(
    config: &Bme280BridgeConfig,
    credentials: &impl CredentialSource,
    shutdown: CancellationToken,
) -> Result<LoopStats> {
    let credentials = credentials.load()?;
    let sensor = Bme280Sensor::open(&config.sensor)?;

    let publisher = MqttPublisher::new(config.mqtt().clone(), credentials);
    tracing::info!(broker = %publisher.broker(), topic = %config.sampler().topic, "Publishing to MQTT");

    let loop_config = config
        .sampler()
        .loop_config()
        .with_debug_readout(config.logging().debug);

    let stats = SamplingLoop::new(sensor, publisher, loop_config)?
        .run(shutdown)
        .await?;

    tracing::info!("Delivered {:.1}% of readings", stats.success_rate());

    Ok(stats)
}
