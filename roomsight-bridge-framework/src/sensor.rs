//! Sensor and clock capabilities consumed by the sampling loop.

use roomsight_common::Measurement;

use crate::error::SensorError;

/// A device producing environmental measurements.
///
/// Reads are synchronous and expected to be short (a few milliseconds on I2C).
pub trait Sensor {
    /// Take one measurement.
    fn read(&mut self) -> Result<Measurement, SensorError>;
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn read(&mut self) -> Result<Measurement, SensorError> {
        (**self).read()
    }
}

/// Wall-clock time source used to timestamp readings.
pub trait Clock {
    /// Seconds since the Unix epoch.
    fn now_secs(&self) -> f64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_secs(&self) -> f64 {
        self.0
    }
}
