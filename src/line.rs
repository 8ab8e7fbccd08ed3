//! The single bidirectional data line the sensor sits on.

use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Direction of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The host samples the line; the sensor may drive it.
    Input,
    /// The host drives the line.
    Output,
}

/// Internal pull resistor setting of the data line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Pull {
    /// No pull resistor.
    None,
    /// Pulled towards the supply.
    Up,
    /// Pulled towards ground.
    #[default]
    Down,
}

/// A GPIO pin that can be switched between input and output and whose
/// internal pulls can be queried and set.
///
/// `embedded-hal` only covers reading and driving levels, so HAL specific
/// pin types need a thin wrapper implementing this trait.
pub trait BusLine: InputPin + OutputPin {
    /// Switches the pin between input and output mode.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Enables or disables the internal pull-up and pull-down resistors.
    fn set_pulls(&mut self, up: bool, down: bool) -> Result<(), Self::Error>;

    /// Returns `true` if the pull-up resistor is enabled.
    fn is_pulled_up(&mut self) -> Result<bool, Self::Error>;

    /// Returns `true` if the pull-down resistor is enabled.
    fn is_pulled_down(&mut self) -> Result<bool, Self::Error>;

    /// Returns `true` if the line is currently at `state`.
    fn is_at(&mut self, state: PinState) -> Result<bool, Self::Error> {
        match state {
            PinState::High => self.is_high(),
            PinState::Low => self.is_low(),
        }
    }

    /// Applies `pull` unless the pin is already configured that way.
    ///
    /// Returns `true` if the pulls had to be changed.
    fn ensure_pull(&mut self, pull: Pull) -> Result<bool, Self::Error> {
        let (up, down) = (self.is_pulled_up()?, self.is_pulled_down()?);
        let wanted = match pull {
            Pull::None => (false, false),
            Pull::Up => (true, false),
            Pull::Down => (false, true),
        };
        if (up, down) == wanted {
            return Ok(false);
        }
        self.set_pulls(wanted.0, wanted.1)?;
        Ok(true)
    }
}

impl<T: BusLine + ?Sized> BusLine for &mut T {
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        T::set_direction(self, direction)
    }

    fn set_pulls(&mut self, up: bool, down: bool) -> Result<(), Self::Error> {
        T::set_pulls(self, up, down)
    }

    fn is_pulled_up(&mut self) -> Result<bool, Self::Error> {
        T::is_pulled_up(self)
    }

    fn is_pulled_down(&mut self) -> Result<bool, Self::Error> {
        T::is_pulled_down(self)
    }
}
