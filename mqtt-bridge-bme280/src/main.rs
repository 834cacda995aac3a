//! MQTT bridge for a BME280 environmental sensor.
//!
//! Reads temperature and humidity over I2C and publishes them to an MQTT
//! broker until the configured number of readings is reached or Ctrl+C.

use anyhow::Result;
use roomsight_bridge_framework::{
    BridgeArgs, BridgeConfig, ConfigError, EnvCredentialSource, shutdown_on_ctrl_c,
};
use roomsight_common::init_tracing;

use mqtt_bridge_bme280::config::Bme280BridgeConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = BridgeArgs::parse();

    // Config file (optional) + flags
    let config = Bme280BridgeConfig::from_args(&args)?;

    init_tracing(config.logging()).map_err(|e| ConfigError::Logging(e.to_string()))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting BME280 bridge");

    let credentials = EnvCredentialSource::from_env();

    if let Err(e) = mqtt_bridge_bme280::run(&config, &credentials, shutdown_on_ctrl_c()).await {
        tracing::error!(error = %e, "Failed to start");
        return Err(e.into());
    }

    tracing::info!("Goodbye!");
    Ok(())
}
