//! Sampling loop: read, encode, publish, sleep.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use roomsight_common::{Measurement, Reading, SEA_LEVEL_PRESSURE_HPA, encode};

use crate::error::{ConfigError, PublishError, Result};
use crate::publisher::{Publisher, QoS};
use crate::sensor::{Clock, Sensor, SystemClock};

/// Lowest accepted publish frequency, per minute.
pub const MIN_FREQUENCY: i64 = 1;

/// Highest accepted publish frequency, per minute.
pub const MAX_FREQUENCY: i64 = 60;

/// Loop parameters, fixed for the lifetime of a [`SamplingLoop`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConfig {
    /// Readings per minute, 1 to 60.
    pub frequency_per_minute: i64,
    /// Destination topic.
    pub topic: String,
    /// Stop after this many ticks; `None` runs until cancelled.
    pub max_iterations: Option<u64>,
    /// Delivery guarantee requested from the publisher.
    pub qos: QoS,
    /// Log the full measurement (pressure, altitude) on every tick.
    pub debug_readout: bool,
}

impl LoopConfig {
    pub fn new(frequency_per_minute: i64, topic: impl Into<String>) -> Self {
        Self {
            frequency_per_minute,
            topic: topic.into(),
            max_iterations: None,
            qos: QoS::AtLeastOnce,
            debug_readout: false,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn with_debug_readout(mut self, enabled: bool) -> Self {
        self.debug_readout = enabled;
        self
    }

    /// Check frequency range and topic.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&self.frequency_per_minute) {
            return Err(ConfigError::InvalidFrequency(self.frequency_per_minute));
        }
        if self.topic.is_empty() {
            return Err(ConfigError::EmptyTopic);
        }
        Ok(())
    }

    /// Delay between ticks: `60 / frequency_per_minute` seconds.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.frequency_per_minute as f64)
    }
}

/// Counters reported when the loop terminates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    /// Completed ticks.
    pub iterations: u64,
    /// Readings the broker acknowledged.
    pub published: u64,
    /// Readings dropped after a publish failure.
    pub failed: u64,
}

impl LoopStats {
    /// Success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.iterations == 0 {
            100.0
        } else {
            (self.published as f64 / self.iterations as f64) * 100.0
        }
    }
}

/// Periodically reads a [`Sensor`] and publishes each [`Reading`].
///
/// Publish failures are logged and the loop moves on to the next tick.
/// Sensor failures end the loop with an error. Cancellation is observed
/// between ticks, never in the middle of a publish.
///
/// # Example
///
/// ```ignore
/// let config = LoopConfig::new(2, "sensors/indoor").with_max_iterations(Some(3));
/// let sampler = SamplingLoop::new(sensor, publisher, config)?;
/// let stats = sampler.run(shutdown_on_ctrl_c()).await?;
/// ```
pub struct SamplingLoop<S, P, C = SystemClock> {
    sensor: S,
    publisher: P,
    clock: C,
    config: LoopConfig,
}

impl<S: Sensor, P: Publisher> SamplingLoop<S, P> {
    /// Create a loop timestamping readings with the system clock.
    ///
    /// Fails with [`ConfigError`] if the frequency is outside 1..=60 or the
    /// topic is empty.
    pub fn new(
        sensor: S,
        publisher: P,
        config: LoopConfig,
    ) -> std::result::Result<Self, ConfigError> {
        Self::with_clock(sensor, publisher, SystemClock, config)
    }
}

impl<S: Sensor, P: Publisher, C: Clock> SamplingLoop<S, P, C> {
    /// Create a loop with an explicit clock.
    pub fn with_clock(
        sensor: S,
        publisher: P,
        clock: C,
        config: LoopConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            sensor,
            publisher,
            clock,
            config,
        })
    }

    /// Get the loop configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run until `max_iterations` ticks complete or `shutdown` is cancelled.
    ///
    /// No delay follows the final tick of a bounded run.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<LoopStats> {
        let interval = self.config.interval();
        let mut stats = LoopStats::default();

        info!(
            topic = %self.config.topic,
            interval_secs = interval.as_secs_f64(),
            max_iterations = ?self.config.max_iterations,
            "Starting to publish readings every {:.1} seconds",
            interval.as_secs_f64()
        );

        loop {
            if self
                .config
                .max_iterations
                .is_some_and(|max| stats.iterations >= max)
            {
                info!(
                    iterations = stats.iterations,
                    published = stats.published,
                    failed = stats.failed,
                    "Reached maximum iterations"
                );
                break;
            }

            if stats.iterations > 0 {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {}
                    _ = tokio::time::sleep(interval) => {}
                }
            }

            if shutdown.is_cancelled() {
                info!(
                    iterations = stats.iterations,
                    published = stats.published,
                    failed = stats.failed,
                    "Shutdown requested, stopping"
                );
                break;
            }

            self.tick(stats.iterations, &mut stats).await?;
            stats.iterations += 1;
        }

        Ok(stats)
    }

    async fn tick(&mut self, iteration: u64, stats: &mut LoopStats) -> Result<()> {
        let measurement = self.sensor.read()?;
        let reading = Reading::new(self.clock.now_secs(), &measurement);

        if self.config.debug_readout {
            log_measurement(&measurement);
        }

        match self.publish(&reading).await {
            Ok(payload) => {
                stats.published += 1;
                info!(topic = %self.config.topic, %payload, "Published reading");
            }
            Err(e) => {
                stats.failed += 1;
                error!(iteration, error = %e, "Failed to publish reading");
            }
        }

        Ok(())
    }

    /// Encode and send one reading, returning the payload text on success.
    async fn publish(&mut self, reading: &Reading) -> std::result::Result<String, PublishError> {
        let payload = encode(reading).map_err(|e| PublishError::Serialization(e.to_string()))?;
        let text = String::from_utf8_lossy(&payload).into_owned();

        self.publisher
            .send(&self.config.topic, payload, self.config.qos)
            .await?;

        Ok(text)
    }
}

fn log_measurement(measurement: &Measurement) {
    info!("Temperature: {:.1} C", measurement.temperature);
    info!("Humidity: {:.1} %", measurement.humidity);
    info!("Pressure: {:.1} hPa", measurement.pressure);
    info!(
        "Altitude: {:.2} meters",
        measurement.altitude(SEA_LEVEL_PRESSURE_HPA)
    );
}

/// Create a token that is cancelled when the process receives Ctrl+C.
///
/// Must be called from within a tokio runtime.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
        }
        trigger.cancel();
    });

    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval() {
        assert_eq!(LoopConfig::new(1, "t").interval(), Duration::from_secs(60));
        assert_eq!(LoopConfig::new(2, "t").interval(), Duration::from_secs(30));
        assert_eq!(LoopConfig::new(60, "t").interval(), Duration::from_secs(1));
        assert_eq!(
            LoopConfig::new(7, "t").interval(),
            Duration::from_secs_f64(60.0 / 7.0)
        );
    }

    #[test]
    fn test_validate_bounds() {
        for freq in [0, 61, -1, i64::MIN, i64::MAX] {
            assert!(
                matches!(
                    LoopConfig::new(freq, "t").validate(),
                    Err(ConfigError::InvalidFrequency(f)) if f == freq
                ),
                "frequency {freq} should be rejected"
            );
        }
        for freq in [1, 30, 60] {
            assert!(LoopConfig::new(freq, "t").validate().is_ok());
        }
    }

    #[test]
    fn test_validate_empty_topic() {
        assert!(matches!(
            LoopConfig::new(1, "").validate(),
            Err(ConfigError::EmptyTopic)
        ));
    }

    #[test]
    fn test_stats_success_rate() {
        let mut stats = LoopStats::default();
        assert_eq!(stats.success_rate(), 100.0);

        stats.iterations = 4;
        stats.published = 3;
        stats.failed = 1;
        assert_eq!(stats.success_rate(), 75.0);
    }
}
