//! Checksum validation and conversion of a frame into physical values.

use crate::decode::RawBytes;
use crate::error::ChecksumError;

/// Highest humidity the conversion accepts before falling back to the
/// integer byte.
const HUMIDITY_CEILING: f32 = 100.0;

/// Highest temperature magnitude the conversion accepts before falling back
/// to the integer byte.
const TEMPERATURE_CEILING: f32 = 125.0;

/// How the four data bytes encode humidity and temperature.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataFormat {
    /// Integer byte followed by a tenths byte (DHT11 style).
    #[default]
    Split,
    /// Big-endian 16-bit value in tenths (DHT22 / AM2302 style).
    Wide,
}

/// Reading returned by the sensor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Relative humidity in percent.
    pub humidity: f32,
    /// Temperature in degrees Celsius.
    pub temperature_celsius: f32,
}

impl Reading {
    /// Temperature in degrees Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> f32 {
        self.temperature_celsius * 1.8 + 32.0
    }
}

impl RawBytes {
    /// Checks the checksum and converts the frame into a [`Reading`].
    ///
    /// Bit 7 of the temperature high byte is the sign. A value above the
    /// sensor's range is replaced by its integer byte alone.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError`] if the checksum byte does not match the
    /// truncated sum of the data bytes.
    pub fn validate(self, format: DataFormat) -> Result<Reading, ChecksumError> {
        let computed = self.computed_checksum();
        if computed != self.checksum() {
            return Err(ChecksumError {
                raw: self,
                computed,
            });
        }
        Ok(self.convert(format))
    }

    fn convert(&self, format: DataFormat) -> Reading {
        let [hum_hi, hum_lo, temp_hi, temp_lo] = self.data();

        let is_temp_negative = (temp_hi >> 7) != 0;
        let temp_hi = temp_hi & 0b0111_1111;

        let (mut humidity, mut temperature) = match format {
            DataFormat::Split => (
                f32::from(hum_hi) + f32::from(hum_lo) / 10.0,
                f32::from(temp_hi) + f32::from(temp_lo) / 10.0,
            ),
            DataFormat::Wide => (
                f32::from(u16::from_be_bytes([hum_hi, hum_lo])) / 10.0,
                f32::from(u16::from_be_bytes([temp_hi, temp_lo])) / 10.0,
            ),
        };

        if humidity > HUMIDITY_CEILING {
            humidity = f32::from(hum_hi);
        }
        // Clamped to the magnitude byte; the sign is applied afterwards, so
        // 0x80 | 126 reads as -126 rather than -254.
        if temperature > TEMPERATURE_CEILING {
            temperature = f32::from(temp_hi);
        }
        if is_temp_negative {
            temperature = -temperature;
        }

        Reading {
            humidity,
            temperature_celsius: temperature,
        }
    }
}
