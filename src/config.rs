use crate::decode::DEFAULT_BIT_THRESHOLD;
use crate::error::ConfigError;
use crate::line::Pull;
use crate::reading::DataFormat;

/// Driver settings.
///
/// The defaults match a DHT11 wired to a pin with the internal pull-down as
/// its idle state, sampled every two seconds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// How long the start signal holds the line low, in milliseconds.
    pub start_low_ms: u32,
    /// How long the line is driven high after the start signal before it is
    /// released to the sensor, in microseconds.
    pub release_us: u32,
    /// Upper bound on the polling iterations of every wait.
    pub max_iterations: u8,
    /// Pulses longer than this many iterations decode as `1`.
    pub bit_threshold: u8,
    /// Pull resistor the line must idle with.
    pub idle_pull: Pull,
    /// Byte layout of the frame.
    pub format: DataFormat,
    /// Spacing between two acquisitions, in milliseconds.
    pub interval_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_low_ms: 18,
            release_us: 10,
            max_iterations: u8::MAX,
            bit_threshold: DEFAULT_BIT_THRESHOLD,
            idle_pull: Pull::Down,
            format: DataFormat::Split,
            interval_ms: 2_000,
        }
    }
}

impl Config {
    /// Sets how long the start signal holds the line low.
    pub fn with_start_low_ms(mut self, start_low_ms: u32) -> Self {
        self.start_low_ms = start_low_ms;
        self
    }

    /// Sets the driven-high guard before the line is released.
    pub fn with_release_us(mut self, release_us: u32) -> Self {
        self.release_us = release_us;
        self
    }

    /// Sets the polling ceiling shared by every wait.
    pub fn with_max_iterations(mut self, max_iterations: u8) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the pulse width above which a bit decodes as `1`.
    pub fn with_bit_threshold(mut self, bit_threshold: u8) -> Self {
        self.bit_threshold = bit_threshold;
        self
    }

    /// Sets the pull the line must idle with.
    pub fn with_idle_pull(mut self, idle_pull: Pull) -> Self {
        self.idle_pull = idle_pull;
        self
    }

    /// Sets the byte layout used for conversion.
    pub fn with_format(mut self, format: DataFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the spacing between two acquisitions.
    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Checks that the settings can produce a frame at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCeiling);
        }
        if self.bit_threshold >= self.max_iterations {
            return Err(ConfigError::ThresholdOutOfRange {
                threshold: self.bit_threshold,
                ceiling: self.max_iterations,
            });
        }
        if self.start_low_ms == 0 {
            return Err(ConfigError::StartSignalTooShort);
        }
        Ok(())
    }
}
