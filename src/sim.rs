//! Simulated data line and clock for tests.
//!
//! Each read of the line costs a fixed amount of time, as on real hardware,
//! so a high pulse of `t` µs is counted as roughly `t / 2` polling
//! iterations with a 1 µs delay per iteration.
//!
//! [`MockLine`] wraps the `embedded-hal-mock` pin for tests that check the
//! exact order of pin operations.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use embedded_hal_mock::eh1::digital::Mock as PinMock;

use crate::line::{BusLine, Direction};

const READ_COST_NS: u64 = 1_000;

/// Shared nanosecond clock, advanced by delays and pin reads.
#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ns(&self) -> u64 {
        self.0.get()
    }

    fn advance(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

/// Delay that only advances the simulated clock.
pub struct SimDelay {
    clock: Clock,
}

impl SimDelay {
    pub fn new(clock: Clock) -> Self {
        SimDelay { clock }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(u64::from(ms) * 1_000_000);
    }
}

/// A level held for a number of microseconds.
pub type Segment = (bool, u32);

/// Waveform of a sensor answering with `bytes`, starting when the host
/// releases the line.
pub fn sensor_frame(bytes: [u8; 5]) -> Vec<Segment> {
    let mut frame = vec![(true, 30), (false, 80), (true, 80)];
    for byte in bytes {
        for i in 0..8 {
            let one = (byte >> (7 - i)) & 1 == 1;
            frame.push((false, 50));
            frame.push((true, if one { 70 } else { 27 }));
        }
    }
    frame.push((false, 50));
    frame
}

/// Data line with a scripted sensor on the other end.
///
/// Every switch from output to input starts the next queued frame. Outside a
/// frame the line sits at its idle level.
pub struct SimLine {
    clock: Clock,
    direction: Direction,
    driven: bool,
    pulled_up: bool,
    pulled_down: bool,
    pull_writes: usize,
    idle: bool,
    frames: VecDeque<Vec<Segment>>,
    current: Vec<Segment>,
    released_at: Option<u64>,
}

impl SimLine {
    pub fn new(clock: Clock) -> Self {
        SimLine {
            clock,
            direction: Direction::Input,
            driven: true,
            pulled_up: false,
            pulled_down: false,
            pull_writes: 0,
            idle: true,
            frames: VecDeque::new(),
            current: Vec::new(),
            released_at: None,
        }
    }

    /// Level the line rests at when neither side drives it.
    pub fn with_idle(mut self, idle: bool) -> Self {
        self.idle = idle;
        self
    }

    pub fn queue(&mut self, frame: Vec<Segment>) {
        self.frames.push_back(frame);
    }

    pub fn pull_writes(&self) -> usize {
        self.pull_writes
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn level(&self) -> bool {
        if self.direction == Direction::Output {
            return self.driven;
        }
        let Some(start) = self.released_at else {
            return self.idle;
        };
        let mut elapsed = self.clock.now_ns() - start;
        for &(level, us) in &self.current {
            let span = u64::from(us) * 1_000;
            if elapsed < span {
                return level;
            }
            elapsed -= span;
        }
        self.idle
    }

    fn sample(&mut self) -> bool {
        let level = self.level();
        self.clock.advance(READ_COST_NS);
        level
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl InputPin for SimLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.sample())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.sample())
    }
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.driven = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.driven = true;
        Ok(())
    }
}

impl BusLine for SimLine {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if self.direction == Direction::Output && direction == Direction::Input {
            self.current = self.frames.pop_front().unwrap_or_default();
            self.released_at = Some(self.clock.now_ns());
        }
        self.direction = direction;
        Ok(())
    }

    fn set_pulls(&mut self, up: bool, down: bool) -> Result<(), Self::Error> {
        self.pulled_up = up;
        self.pulled_down = down;
        self.pull_writes += 1;
        Ok(())
    }

    fn is_pulled_up(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pulled_up)
    }

    fn is_pulled_down(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pulled_down)
    }
}

/// Direction and pull changes seen by a [`MockLine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEvent {
    Direction(Direction),
    Pulls { up: bool, down: bool },
}

/// Pin mock with the [`BusLine`] extras recorded alongside.
///
/// Levels go through the `embedded-hal-mock` pin so their exact order can be
/// checked; direction and pull changes are kept as [`LineEvent`]s.
pub struct MockLine {
    pin: PinMock,
    pulled_up: bool,
    pulled_down: bool,
    events: Vec<LineEvent>,
}

impl MockLine {
    pub fn new(pin: PinMock) -> Self {
        MockLine {
            pin,
            pulled_up: false,
            pulled_down: false,
            events: Vec::new(),
        }
    }

    pub fn with_pulls(mut self, up: bool, down: bool) -> Self {
        self.pulled_up = up;
        self.pulled_down = down;
        self
    }

    pub fn events(&self) -> &[LineEvent] {
        &self.events
    }
}

impl ErrorType for MockLine {
    type Error = <PinMock as ErrorType>::Error;
}

impl InputPin for MockLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl BusLine for MockLine {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        self.events.push(LineEvent::Direction(direction));
        Ok(())
    }

    fn set_pulls(&mut self, up: bool, down: bool) -> Result<(), Self::Error> {
        self.pulled_up = up;
        self.pulled_down = down;
        self.events.push(LineEvent::Pulls { up, down });
        Ok(())
    }

    fn is_pulled_up(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pulled_up)
    }

    fn is_pulled_down(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pulled_down)
    }
}
