use embedded_hal::delay::DelayNs;

use crate::capture::Capture;
use crate::config::Config;
use crate::decode::{BitDecoder, RawBytes};
use crate::error::{ConfigError, DhtError};
use crate::line::BusLine;
use crate::reading::Reading;

/// Driver for a DHT-family temperature and humidity sensor.
pub struct Dht<LINE, DELAY> {
    line: LINE,
    delay: DELAY,
    config: Config,
    decoder: BitDecoder,
}

impl<LINE, DELAY, E> Dht<LINE, DELAY>
where
    LINE: BusLine<Error = E>,
    DELAY: DelayNs,
{
    /// Creates a new instance of the driver with the default [`Config`].
    ///
    /// # Arguments
    ///
    /// * `line` - The GPIO pin connected to the sensor's data line.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(line: LINE, delay: DELAY) -> Self {
        Dht {
            line,
            delay,
            config: Config::default(),
            decoder: BitDecoder::default(),
        }
    }

    /// Creates a new instance of the driver with custom settings.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] found by [`Config::validate`].
    pub fn with_config(line: LINE, delay: DELAY, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Dht {
            line,
            delay,
            config,
            decoder: BitDecoder::new(config.bit_threshold),
        })
    }

    /// Settings the driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Performs one measurement cycle.
    ///
    /// Sends the start signal, records the sensor's 40 data pulses, decodes
    /// them and validates the checksum.
    ///
    /// # Returns
    ///
    /// * `Ok(Reading)` if the sensor answered and the checksum is valid.
    /// * `Err(DhtError)` otherwise. No reading is produced for a failed cycle;
    ///   the caller retries on its next cycle.
    pub fn acquire(&mut self) -> Result<Reading, DhtError<E>> {
        let raw = self.acquire_raw()?;
        raw.validate(self.config.format).map_err(|err| {
            warn!(
                "checksum mismatch: data {:?}, received {}, computed {}",
                err.raw.data(),
                err.raw.checksum(),
                err.computed
            );
            DhtError::ChecksumMismatch(err)
        })
    }

    /// Captures and decodes one frame without checking its checksum.
    pub fn acquire_raw(&mut self) -> Result<RawBytes, DhtError<E>> {
        debug!("waking sensor...");
        let pulses = Capture::new(&mut self.line, &mut self.delay, &self.config).run()?;
        let raw = self.decoder.decode(&pulses);
        trace!("raw bytes: {:?}", raw.0);
        Ok(raw)
    }

    /// Blocks for the configured interval between two measurements.
    pub fn wait_interval(&mut self) {
        self.delay.delay_ms(self.config.interval_ms);
    }

    /// Releases the line and the delay.
    pub fn release(self) -> (LINE, DELAY) {
        (self.line, self.delay)
    }
}
