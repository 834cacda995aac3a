//! BME280 access over Linux i2c-dev.

use roomsight_bridge_framework::{Measurement, Sensor, SensorError};

use crate::config::SensorConfig;

/// Convert raw driver output (pressure in Pa) to a [`Measurement`].
pub fn to_measurement(temperature: f32, humidity: f32, pressure_pa: f32) -> Measurement {
    Measurement::new(
        f64::from(temperature),
        f64::from(humidity),
        f64::from(pressure_pa) / 100.0,
    )
}

#[cfg(target_os = "linux")]
mod driver {
    use bme280::i2c::BME280;
    use linux_embedded_hal::{Delay, I2cdev};

    use super::*;
    use crate::config::SensorAddress;

    /// A BME280 on an I2C bus.
    pub struct Bme280Sensor {
        device: BME280<I2cdev>,
        delay: Delay,
    }

    impl Bme280Sensor {
        /// Open the bus and initialize the device.
        pub fn open(config: &SensorConfig) -> Result<Self, SensorError> {
            let i2c = I2cdev::new(&config.i2c_bus).map_err(|e| {
                SensorError::Init(format!("{}: {}", config.i2c_bus.display(), e))
            })?;

            let mut device = match config.address {
                SensorAddress::Primary => BME280::new_primary(i2c),
                SensorAddress::Secondary => BME280::new_secondary(i2c),
            };

            let mut delay = Delay;
            device.init(&mut delay).map_err(|e| {
                SensorError::Init(format!(
                    "no BME280 at {:#04x} on {}: {:?}",
                    config.address.as_u8(),
                    config.i2c_bus.display(),
                    e
                ))
            })?;

            tracing::info!(
                bus = %config.i2c_bus.display(),
                address = %format!("{:#04x}", config.address.as_u8()),
                "BME280 sensor initialized successfully"
            );

            Ok(Self { device, delay })
        }
    }

    impl Sensor for Bme280Sensor {
        fn read(&mut self) -> Result<Measurement, SensorError> {
            let m = self
                .device
                .measure(&mut self.delay)
                .map_err(|e| SensorError::Read(format!("{:?}", e)))?;

            Ok(to_measurement(m.temperature, m.humidity, m.pressure))
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod driver {
    use super::*;

    /// Placeholder on platforms without i2c-dev.
    pub struct Bme280Sensor {
        _private: (),
    }

    impl Bme280Sensor {
        pub fn open(config: &SensorConfig) -> Result<Self, SensorError> {
            Err(SensorError::Unsupported(format!(
                "{} requires Linux i2c-dev",
                config.i2c_bus.display()
            )))
        }
    }

    impl Sensor for Bme280Sensor {
        fn read(&mut self) -> Result<Measurement, SensorError> {
            Err(SensorError::Unsupported("BME280 requires Linux i2c-dev".into()))
        }
    }
}

pub use driver::Bme280Sensor;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pressure_converted_to_hpa() {
        let m = to_measurement(22.5, 45.0, 101_325.0);

        assert_eq!(m.temperature, 22.5);
        assert_eq!(m.humidity, 45.0);
        assert!((m.pressure - 1013.25).abs() < 1e-9);
    }

    #[test]
    fn test_open_missing_bus_fails_with_sensor_error() {
        let config = SensorConfig {
            i2c_bus: PathBuf::from("/nonexistent/i2c-42"),
            ..Default::default()
        };

        match Bme280Sensor::open(&config) {
            Err(SensorError::Init(msg)) => assert!(msg.contains("/nonexistent/i2c-42")),
            Err(SensorError::Unsupported(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing bus must fail"),
        }
    }
}
