//! DHT Sensor Driver for Embedded Rust
//!
//! This crate provides a platform-agnostic driver for the DHT family of
//! single-wire temperature and humidity sensors, built on top of the
//! [`embedded-hal`] traits. It bit-bangs the wake sequence on one GPIO line,
//! measures the width of each data pulse by polling, and decodes the widths
//! into a checksum-validated [`Reading`].
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Every wait bounded by an iteration ceiling, so a missing sensor never
//!   hangs the caller
//! - Both byte layouts: integer + tenths (DHT11) and 16-bit tenths (DHT22)
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access, plus this crate's
//!   [`BusLine`] for direction and pull control
//! - [`DelayNs`] for accurate timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and logs through `defmt`
//! - `log`: Logs through the `log` facade
//!
//! # Usage
//!
//! The surrounding application owns the measurement loop:
//!
//! ```ignore
//! let mut dht = Dht::new(line, delay);
//! loop {
//!     match dht.acquire() {
//!         Ok(reading) => report(reading),
//!         Err(err) => log_failure(err),
//!     }
//!     dht.wait_interval();
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod capture;
pub mod config;
pub mod decode;
pub mod dht;
pub mod error;
pub mod line;
pub mod reading;

#[cfg(test)]
mod sim;

pub use capture::{Capture, Phase};
pub use config::Config;
pub use decode::{BitDecoder, PulseBuffer, RawBytes};
pub use dht::Dht;
pub use error::{ChecksumError, ConfigError, DhtError};
pub use line::{BusLine, Direction, Pull};
pub use reading::{DataFormat, Reading};
