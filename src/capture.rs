//! Pulse capture.
//!
//! # Protocol
//!
//! ```txt
//!    START     REL  RESP   ACK    READY    GAP  0 BIT  GAP  1 BIT
//! ──┐        ┌────┬────┐      ┌──────┐      ┌────┐      ┌────────┐
//!   │        │    :    │      │      │      │    │      │        │
//!   └────────┘    :    └──────┘      └──────┘    └──────┘        └──
//!     18ms    10μs 20-40μs 80μs   80μs    50μs 26-28μs 50μs  70μs
//! ```
//!
//! The host drives the start signal and releases the line. The sensor
//! acknowledges by pulling the line low, then high, then sends 40 bits, each
//! a low gap followed by a high pulse whose width encodes the bit.
//!
//! Every wait is a bounded polling loop with a 1 µs delay per iteration, so
//! a capture always terminates even with nothing on the bus.

use embedded_hal::{delay::DelayNs, digital::PinState};

use crate::config::Config;
use crate::decode::{PULSE_COUNT, PulseBuffer, SATURATED};
use crate::error::DhtError;
use crate::line::{BusLine, Direction};

/// Where a capture currently is.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The start signal has not been sent yet.
    Idle,
    /// Start signal sent, waiting for the sensor's response.
    AwaitingAck,
    /// Measuring data pulse `next`.
    Capturing { next: usize },
    /// All pulses recorded.
    Done,
}

/// One capture cycle over a borrowed line and delay.
///
/// The pulse buffer starts zeroed and is handed out by value when the cycle
/// is done, so nothing carries over from one cycle to the next.
pub struct Capture<'a, LINE, DELAY> {
    line: &'a mut LINE,
    delay: &'a mut DELAY,
    config: &'a Config,
    phase: Phase,
    pulses: PulseBuffer,
}

impl<'a, LINE, DELAY, E> Capture<'a, LINE, DELAY>
where
    LINE: BusLine<Error = E>,
    DELAY: DelayNs,
{
    /// Prepares a cycle in [`Phase::Idle`] with a zeroed pulse buffer.
    pub fn new(line: &'a mut LINE, delay: &'a mut DELAY, config: &'a Config) -> Self {
        Capture {
            line,
            delay,
            config,
            phase: Phase::Idle,
            pulses: [0; PULSE_COUNT],
        }
    }

    /// Current phase of the cycle.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the cycle to completion and returns the recorded durations.
    pub fn run(mut self) -> Result<PulseBuffer, DhtError<E>> {
        while self.step()? != Phase::Done {}
        trace!("pulse widths: {:?}", &self.pulses[..]);
        Ok(self.pulses)
    }

    /// Advances the cycle by one phase, or by one pulse while capturing.
    ///
    /// # Errors
    ///
    /// Returns [`DhtError::CaptureTimeout`] if the sensor does not answer,
    /// or lets go of the bus in the middle of the frame.
    pub fn step(&mut self) -> Result<Phase, DhtError<E>> {
        self.phase = match self.phase {
            Phase::Idle => {
                self.start_signal()?;
                Phase::AwaitingAck
            }
            Phase::AwaitingAck => {
                self.await_ack()?;
                debug!("sensor acknowledged");
                Phase::Capturing { next: 0 }
            }
            Phase::Capturing { next } => {
                self.pulses[next] = self.measure_pulse(next)?;
                if next + 1 == PULSE_COUNT {
                    Phase::Done
                } else {
                    Phase::Capturing { next: next + 1 }
                }
            }
            Phase::Done => Phase::Done,
        };
        Ok(self.phase)
    }

    /// Wakes the sensor.
    fn start_signal(&mut self) -> Result<(), DhtError<E>> {
        if self.line.ensure_pull(self.config.idle_pull)? {
            debug!("line pull reset to {:?}", self.config.idle_pull);
        }

        self.line.set_direction(Direction::Output)?;
        self.line.set_low()?;
        self.delay.delay_ms(self.config.start_low_ms);
        self.line.set_high()?;
        self.delay.delay_us(self.config.release_us);
        self.line.set_direction(Direction::Input)?;
        Ok(())
    }

    /// Waits out the sensor's response: the released high level, the low
    /// acknowledgement and the high ready level.
    fn await_ack(&mut self) -> Result<(), DhtError<E>> {
        for state in [PinState::High, PinState::Low, PinState::High] {
            if self.hold_time(state)?.is_none() {
                warn!("sensor not responding");
                return Err(DhtError::CaptureTimeout);
            }
        }
        Ok(())
    }

    /// Measures the high width of data pulse `index`.
    ///
    /// A saturated pulse is followed through to its falling edge, so the
    /// next measurement starts on the next low gap.
    fn measure_pulse(&mut self, index: usize) -> Result<u8, DhtError<E>> {
        if self.hold_time(PinState::Low)?.is_none() {
            warn!("bus stuck low before pulse {}", index);
            return Err(DhtError::CaptureTimeout);
        }
        if let Some(width) = self.hold_time(PinState::High)? {
            return Ok(width);
        }
        if self.hold_time(PinState::High)?.is_none() {
            warn!("bus stuck high after pulse {}", index);
            return Err(DhtError::CaptureTimeout);
        }
        Ok(SATURATED)
    }

    /// Counts the polling iterations the line stays at `state`.
    ///
    /// Returns `None` if it is still there after `max_iterations`.
    fn hold_time(&mut self, state: PinState) -> Result<Option<u8>, E> {
        for count in 0..self.config.max_iterations {
            if !self.line.is_at(state)? {
                return Ok(Some(count));
            }
            self.delay.delay_us(1);
        }
        Ok(None)
    }
}
