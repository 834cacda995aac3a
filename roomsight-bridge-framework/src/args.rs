//! CLI argument parsing for bridges.

use std::path::PathBuf;

use clap::Parser;

use crate::config::SamplerConfig;
use crate::{LoggingConfig, MqttConfig};

/// Common CLI arguments for all bridges.
///
/// Every value flag is optional so that an explicit flag can be told apart
/// from a default; unset flags leave the configuration file (or the
/// built-in default shown in the help) untouched.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about = "Publish sensor readings to an MQTT broker")]
pub struct BridgeArgs {
    /// Path to a JSON5 configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Messages to publish per minute, 1 to 60 [default: 1].
    #[arg(long, allow_negative_numbers = true)]
    pub freq: Option<i64>,

    /// MQTT broker address [default: localhost].
    #[arg(long)]
    pub hostname: Option<String>,

    /// MQTT broker port [default: 1883].
    #[arg(long)]
    pub port: Option<u16>,

    /// MQTT topic to publish to [default: sensors/indoor].
    #[arg(long)]
    pub topic: Option<String>,

    /// Enable stdout logging (INFO+) and extra sensor readouts.
    #[arg(long)]
    pub debug: bool,

    /// File path for WARNING+ logs [default: warnings.log].
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Stop after publishing this many readings.
    #[arg(long)]
    pub max_iterations: Option<u64>,

    /// Override console log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl BridgeArgs {
    /// Parse CLI arguments from the process command line.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Apply broker flags.
    pub fn apply_mqtt(&self, mqtt: &mut MqttConfig) {
        if let Some(ref hostname) = self.hostname {
            mqtt.hostname = hostname.clone();
        }
        if let Some(port) = self.port {
            mqtt.port = port;
        }
    }

    /// Apply sampling flags.
    pub fn apply_sampler(&self, sampler: &mut SamplerConfig) {
        if let Some(freq) = self.freq {
            sampler.frequency = freq;
        }
        if let Some(ref topic) = self.topic {
            sampler.topic = topic.clone();
        }
        if self.max_iterations.is_some() {
            sampler.max_iterations = self.max_iterations;
        }
    }

    /// Apply logging flags. `--debug` can only switch the console sink on.
    pub fn apply_logging(&self, logging: &mut LoggingConfig) {
        if self.debug {
            logging.debug = true;
        }
        if let Some(ref path) = self.log_file {
            logging.log_file = path.clone();
        }
        if let Some(ref level) = self.log_level {
            logging.level = level.clone();
        }
    }
}
