//! Pulse widths to bytes.
//!
//! Each data pulse encodes one bit: a long high level is a `1`, a short one
//! a `0`. Bits arrive most significant first.

use crate::error::ConfigError;

/// Number of data pulses in one frame.
pub const PULSE_COUNT: usize = 40;

/// Number of bytes in one frame.
pub const FRAME_BYTES: usize = PULSE_COUNT / 8;

/// Stored in place of a duration when the pulse reached the iteration ceiling.
pub const SATURATED: u8 = u8::MAX;

/// Default boundary between a `0` and a `1` pulse, in polling iterations.
///
/// A `0` is held high for 26-28 µs and a `1` for about 70 µs. Each polling
/// iteration costs a 1 µs delay plus the pin read, so on a typical MCU the
/// two land well below and well above this value.
pub const DEFAULT_BIT_THRESHOLD: u8 = 24;

const _: () = assert!(PULSE_COUNT % 8 == 0, "pulses must fill whole bytes");

/// Recorded high durations for one frame, in polling iterations.
pub type PulseBuffer = [u8; PULSE_COUNT];

/// The five bytes of one frame: humidity high/low, temperature high/low and
/// the checksum.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawBytes(pub [u8; FRAME_BYTES]);

impl RawBytes {
    /// The four data bytes.
    pub fn data(&self) -> [u8; 4] {
        let [b0, b1, b2, b3, _] = self.0;
        [b0, b1, b2, b3]
    }

    /// The checksum byte as received.
    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// Truncated sum of the four data bytes.
    pub fn computed_checksum(&self) -> u8 {
        self.data().iter().fold(0u8, |sum, v| sum.wrapping_add(*v))
    }

    /// Returns `true` if the checksum byte matches the data.
    pub fn checksum_ok(&self) -> bool {
        self.checksum() == self.computed_checksum()
    }
}

/// Turns pulse durations into bits using a fixed threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitDecoder {
    threshold: u8,
}

impl Default for BitDecoder {
    fn default() -> Self {
        BitDecoder::new(DEFAULT_BIT_THRESHOLD)
    }
}

impl BitDecoder {
    /// Creates a decoder treating durations above `threshold` as `1`.
    pub fn new(threshold: u8) -> Self {
        BitDecoder { threshold }
    }

    /// Duration above which a pulse decodes as `1`.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Decodes one full frame.
    pub fn decode(&self, pulses: &PulseBuffer) -> RawBytes {
        let mut bytes = [0u8; FRAME_BYTES];
        for (byte, chunk) in bytes.iter_mut().zip(pulses.chunks_exact(8)) {
            *byte = self.pack(chunk);
        }
        RawBytes(bytes)
    }

    /// Decodes an arbitrary number of pulses into `out`.
    ///
    /// `out` is cleared first, so nothing from a previous decode survives.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnalignedPulseCount`] if `pulses` does not fill
    /// whole bytes and [`ConfigError::OutputLength`] if `out` is not exactly
    /// `pulses.len() / 8` bytes long.
    pub fn decode_into(&self, pulses: &[u8], out: &mut [u8]) -> Result<(), ConfigError> {
        if pulses.len() % 8 != 0 {
            return Err(ConfigError::UnalignedPulseCount {
                pulses: pulses.len(),
            });
        }
        let expected = pulses.len() / 8;
        if out.len() != expected {
            return Err(ConfigError::OutputLength {
                expected,
                actual: out.len(),
            });
        }

        out.fill(0);
        for (byte, chunk) in out.iter_mut().zip(pulses.chunks_exact(8)) {
            *byte = self.pack(chunk);
        }
        Ok(())
    }

    /// Packs eight durations into one byte, first duration in the MSB.
    fn pack(&self, chunk: &[u8]) -> u8 {
        chunk.iter().enumerate().fold(0u8, |byte, (i, &duration)| {
            if duration > self.threshold {
                byte | (1 << (7 - i))
            } else {
                byte
            }
        })
    }
}
