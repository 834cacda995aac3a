use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Standard sea-level pressure used for altitude estimates, in hPa.
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Raw output of one environmental sensor measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Degrees Celsius.
    pub temperature: f64,

    /// Percent relative humidity.
    pub humidity: f64,

    /// Barometric pressure in hPa.
    pub pressure: f64,
}

impl Measurement {
    /// Create a new measurement.
    pub fn new(temperature: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
        }
    }

    /// Approximate altitude in meters for the given sea-level pressure (hPa).
    pub fn altitude(&self, sea_level_hpa: f64) -> f64 {
        44330.0 * (1.0 - (self.pressure / sea_level_hpa).powf(0.1903))
    }
}

/// A single published sensor reading.
///
/// Serializes to exactly `{"ts": .., "temperature": .., "humidity": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Unix epoch milliseconds when the measurement was taken.
    pub ts: f64,

    /// Degrees Celsius.
    pub temperature: f64,

    /// Percent relative humidity. Passed through unvalidated.
    pub humidity: f64,
}

impl Reading {
    /// Build a reading from a measurement captured at `captured_at_secs`
    /// (seconds since the Unix epoch).
    pub fn new(captured_at_secs: f64, measurement: &Measurement) -> Self {
        Self {
            ts: captured_at_secs * 1000.0,
            temperature: measurement.temperature,
            humidity: measurement.humidity,
        }
    }
}

/// Get the current time in seconds since Unix epoch, with sub-second precision.
///
/// Returns 0 if system time is before Unix epoch (should never happen in practice).
pub fn current_timestamp_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
