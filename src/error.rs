use core::fmt;

use crate::decode::RawBytes;

/// Possible errors from one acquisition cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// The sensor did not acknowledge the start signal, or stopped driving
    /// the bus before the frame was complete.
    CaptureTimeout,
    /// The decoded bytes failed the checksum.
    ChecksumMismatch(ChecksumError),
    /// Error from the GPIO pin (input/output).
    PinError(E),
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::CaptureTimeout => write!(f, "sensor not responding"),
            DhtError::ChecksumMismatch(err) => write!(f, "{err}"),
            DhtError::PinError(err) => write!(f, "pin error: {err:?}"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for DhtError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            DhtError::CaptureTimeout => defmt::write!(f, "sensor not responding"),
            DhtError::ChecksumMismatch(err) => defmt::write!(f, "{}", err),
            DhtError::PinError(_) => defmt::write!(f, "pin error"),
        }
    }
}

/// The checksum byte did not match the sum of the four data bytes.
///
/// The raw bytes are kept so the caller can log them.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChecksumError {
    /// The bytes as decoded from the bus.
    pub raw: RawBytes,
    /// Truncated sum of the four data bytes.
    pub computed: u8,
}

impl fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checksum mismatch (received {:#04x}, computed {:#04x}, data {:?})",
            self.raw.checksum(),
            self.computed,
            self.raw.data()
        )
    }
}

/// Configuration defects. These are detected once, when the driver is built,
/// and never per cycle.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The number of pulses does not fill whole bytes.
    UnalignedPulseCount { pulses: usize },
    /// The output buffer cannot hold exactly `pulses / 8` bytes.
    OutputLength { expected: usize, actual: usize },
    /// The bit threshold is not below the iteration ceiling, so a `1` bit
    /// could never be told apart from a saturated pulse.
    ThresholdOutOfRange { threshold: u8, ceiling: u8 },
    /// Bounded waits need at least one iteration.
    ZeroIterationCeiling,
    /// The start signal must hold the line low for at least 1 ms.
    StartSignalTooShort,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnalignedPulseCount { pulses } => {
                write!(f, "{pulses} pulses is not a multiple of 8")
            }
            ConfigError::OutputLength { expected, actual } => {
                write!(f, "output holds {actual} bytes, expected {expected}")
            }
            ConfigError::ThresholdOutOfRange { threshold, ceiling } => write!(
                f,
                "bit threshold {threshold} must be below the iteration ceiling {ceiling}"
            ),
            ConfigError::ZeroIterationCeiling => write!(f, "iteration ceiling is zero"),
            ConfigError::StartSignalTooShort => write!(f, "start signal shorter than 1 ms"),
        }
    }
}
