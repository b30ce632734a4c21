//! # embedded-flight-motors
//! A `#![no_std]` motor output layer for embedded flight controllers.
//!
//! [`MotorDevice`] drives a set of ESCs over one of the supported [`Protocol`]s and
//! hides the protocol behind a common lifecycle.
//! Commands are normalized (`0 ~ 1`, or `-1 ~ 1` for bidirectional outputs) and mapped
//! onto the protocol's native range by a [`Converter`] built from the configured
//! [`Endpoints`].
//!
//! # Protocols
//! [`backend`] contains the protocol implementations.
//! Analog and brushed protocols run on any [`embedded_hal::PwmPin`], digital ones are
//! handed to a [`DshotTransport`](hal::DshotTransport).
//!
//! # Board support
//! [`hardware_revision`] detects the board revision from its ID divider at boot.
//!
//! ```
//! use core::convert::Infallible;
//! use embedded_flight_motors::hal::MotorHardware;
//! use embedded_flight_motors::{MotorDevConfig, MotorDevice, Protocol};
//! use embedded_hal::PwmPin;
//! use embedded_time::rate::Hertz;
//!
//! #[derive(Default)]
//! struct Channel(u16);
//!
//! impl PwmPin for Channel {
//!     type Duty = u16;
//!
//!     fn disable(&mut self) {}
//!     fn enable(&mut self) {}
//!
//!     fn get_duty(&self) -> u16 {
//!         self.0
//!     }
//!
//!     fn get_max_duty(&self) -> u16 {
//!         2500
//!     }
//!
//!     fn set_duty(&mut self, duty: u16) {
//!         self.0 = duty;
//!     }
//! }
//!
//! let config = MotorDevConfig::builder()
//!     .protocol(Protocol::Standard)
//!     .rate(Hertz(400))
//!     .build();
//!
//! let mut motors = MotorDevice::<Channel, Infallible, 4>::new();
//! let pins = [(); 4].map(|_| Channel::default());
//! motors
//!     .init(&config, config.default_idle_pulse(), 4, MotorHardware::timers(pins))
//!     .unwrap();
//! motors.enable().unwrap();
//!
//! motors.update_start().unwrap();
//! motors.write_all(&[0.5, 0.5, 0.5, 0.5]).unwrap();
//! motors.update_complete().unwrap();
//! ```

#![no_std]

mod fmt;

pub mod backend;
pub use backend::{Backend, MotorBackend, MAX_SUPPORTED_MOTORS};

pub mod board;

mod config;
pub use config::{Builder, Config3d, MotorDevConfig, BRUSHED_PWM_RATE, DEFAULT_PWM_RATE};

mod convert;
pub use convert::Converter;

mod device;
pub use device::MotorDevice;

mod endpoints;
pub use endpoints::{compute_endpoints, Endpoints};

mod error;
pub use error::{ConfigError, Error};

pub mod hal;

pub mod hardware_revision;
pub use hardware_revision::{detect_hardware_revision, HardwareRevision};

pub mod protocol;
pub use protocol::{Protocol, ProtocolKind, ProtocolSpec};

#[cfg(test)]
mod mock;

/// Constrain `amt` to `low ~ high`. NaN is constrained to the middle of the range.
pub(crate) fn constrain(amt: f32, low: f32, high: f32) -> f32 {
    if amt.is_nan() {
        return (low + high) / 2.;
    }

    if amt < low {
        return low;
    }

    if amt > high {
        return high;
    }

    amt
}
