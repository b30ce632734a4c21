//! Protocol backends behind the motor device.
//!
//! Every backend implements the same [`MotorBackend`] operations.
//! [`Backend::select`] picks the implementation for the configured protocol when the
//! device is initialized.

use embedded_hal::PwmPin;
use num_traits::PrimInt;

use crate::hal::{DshotTransport, MotorHardware};
use crate::protocol::ProtocolKind;
use crate::{ConfigError, Converter, MotorDevConfig};

mod brushed;
pub use brushed::BrushedBackend;

mod dshot;
pub use dshot::DshotBackend;

mod null;
pub use null::NullBackend;

mod pwm;
pub use pwm::PwmBackend;

mod timer;
pub use timer::{duty_from_fraction, TimerOutputs};

/// Most outputs any backend drives.
pub const MAX_SUPPORTED_MOTORS: usize = 8;

/// Operations every protocol backend provides.
///
/// Values passed to [`write`](Self::write) and [`write_int`](Self::write_int) are in the
/// protocol's native unit. Indices are checked by the caller.
pub trait MotorBackend {
    /// Map a native protocol value to a normalized command.
    fn convert_external_to_motor(&self, external: u16) -> f32;

    /// Map a normalized command to a native protocol value.
    fn convert_motor_to_external(&self, motor: f32) -> u16;

    /// Start output generation at the disarm value.
    fn enable(&mut self) -> bool;

    fn disable(&mut self);

    fn is_motor_enabled(&self, index: usize) -> bool;

    /// Returns `false` while the hardware cannot accept a new cycle.
    fn update_start(&mut self) -> bool;

    /// Stage a native value.
    fn write(&mut self, index: usize, value: f32);

    /// Stage an exact native value.
    fn write_int(&mut self, index: usize, value: u16);

    /// Send every staged value to the hardware.
    fn update_complete(&mut self);

    /// Stop all outputs immediately, whatever state the cycle is in.
    fn shutdown(&mut self);
}

/// The closed set of backends a device can run.
pub enum Backend<P, T, const N: usize> {
    Null(NullBackend),
    Pwm(PwmBackend<P, N>),
    Brushed(BrushedBackend<P, N>),
    Dshot(DshotBackend<T, N>),
}

impl<P, T, const N: usize> Default for Backend<P, T, N> {
    fn default() -> Self {
        Backend::Null(NullBackend)
    }
}

impl<P, T, const N: usize> Backend<P, T, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
    T: DshotTransport,
{
    /// Build the backend for `config` on `hardware`, driving `count` outputs.
    pub fn select(
        config: &MotorDevConfig,
        count: usize,
        converter: Converter,
        hardware: MotorHardware<P, T, N>,
    ) -> Result<Self, ConfigError> {
        let protocol = config.protocol;

        match (protocol.kind(), hardware) {
            (ProtocolKind::Analog, MotorHardware::Timers(pins)) => {
                check_count(count, N)?;
                let backend = PwmBackend::new(
                    pins,
                    count,
                    protocol,
                    config.pwm_rate,
                    config.inverted,
                    converter,
                )?;
                Ok(Backend::Pwm(backend))
            }
            (ProtocolKind::Brushed, MotorHardware::Timers(pins)) => {
                check_count(count, N)?;
                let backend =
                    BrushedBackend::new(pins, count, config.pwm_rate, config.inverted, converter)?;
                Ok(Backend::Brushed(backend))
            }
            (ProtocolKind::Digital, MotorHardware::Dshot(transport)) => {
                check_count(count, N.min(transport.channels()))?;
                Ok(Backend::Dshot(DshotBackend::new(transport, count, converter)))
            }
            _ => Err(ConfigError::UnsupportedProtocol(protocol)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Backend::Null(_))
    }
}

fn check_count(requested: usize, channels: usize) -> Result<(), ConfigError> {
    let available = channels.min(MAX_SUPPORTED_MOTORS);
    if requested > available {
        return Err(ConfigError::TooManyOutputs {
            requested,
            available,
        });
    }
    Ok(())
}

macro_rules! dispatch {
    ($self:expr, $backend:ident => $call:expr) => {
        match $self {
            Backend::Null($backend) => $call,
            Backend::Pwm($backend) => $call,
            Backend::Brushed($backend) => $call,
            Backend::Dshot($backend) => $call,
        }
    };
}

impl<P, T, const N: usize> MotorBackend for Backend<P, T, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
    T: DshotTransport,
{
    fn convert_external_to_motor(&self, external: u16) -> f32 {
        dispatch!(self, b => b.convert_external_to_motor(external))
    }

    fn convert_motor_to_external(&self, motor: f32) -> u16 {
        dispatch!(self, b => b.convert_motor_to_external(motor))
    }

    fn enable(&mut self) -> bool {
        dispatch!(self, b => b.enable())
    }

    fn disable(&mut self) {
        dispatch!(self, b => b.disable())
    }

    fn is_motor_enabled(&self, index: usize) -> bool {
        dispatch!(self, b => b.is_motor_enabled(index))
    }

    fn update_start(&mut self) -> bool {
        dispatch!(self, b => b.update_start())
    }

    fn write(&mut self, index: usize, value: f32) {
        dispatch!(self, b => b.write(index, value))
    }

    fn write_int(&mut self, index: usize, value: u16) {
        dispatch!(self, b => b.write_int(index, value))
    }

    fn update_complete(&mut self) {
        dispatch!(self, b => b.update_complete())
    }

    fn shutdown(&mut self) {
        dispatch!(self, b => b.shutdown())
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use super::*;
    use crate::hal::NoPins;
    use crate::mock::{MockPin, MockTransport};
    use crate::{compute_endpoints, Protocol};

    fn converter(protocol: Protocol) -> Converter {
        Converter::new(compute_endpoints(protocol, protocol.spec().idle, 1., None), false)
    }

    fn config(protocol: Protocol) -> MotorDevConfig {
        MotorDevConfig::builder().protocol(protocol).build()
    }

    #[test]
    fn timers_run_analog_and_brushed() {
        let backend = Backend::<_, Infallible, 4>::select(
            &config(Protocol::Standard),
            4,
            converter(Protocol::Standard),
            MotorHardware::timers([MockPin::new(1000); 4]),
        );
        assert!(matches!(backend, Ok(Backend::Pwm(_))));

        let backend = Backend::<_, Infallible, 4>::select(
            &config(Protocol::Brushed),
            2,
            converter(Protocol::Brushed),
            MotorHardware::timers([MockPin::new(1000); 4]),
        );
        assert!(matches!(backend, Ok(Backend::Brushed(_))));
    }

    #[test]
    fn dshot_needs_a_transport() {
        let backend = Backend::<_, Infallible, 4>::select(
            &config(Protocol::DShot600),
            4,
            converter(Protocol::DShot600),
            MotorHardware::timers([MockPin::new(1000); 4]),
        );
        assert_eq!(
            backend.err(),
            Some(ConfigError::UnsupportedProtocol(Protocol::DShot600))
        );

        let backend = Backend::<NoPins, _, 4>::select(
            &config(Protocol::DShot600),
            4,
            converter(Protocol::DShot600),
            MotorHardware::dshot(MockTransport::new(4)),
        );
        assert!(matches!(backend, Ok(Backend::Dshot(_))));
    }

    #[test]
    fn output_count_is_limited_by_hardware() {
        let backend = Backend::<_, Infallible, 4>::select(
            &config(Protocol::Standard),
            5,
            converter(Protocol::Standard),
            MotorHardware::timers([MockPin::new(1000); 4]),
        );
        assert_eq!(
            backend.err(),
            Some(ConfigError::TooManyOutputs {
                requested: 5,
                available: 4
            })
        );

        let backend = Backend::<NoPins, _, 8>::select(
            &config(Protocol::DShot300),
            4,
            converter(Protocol::DShot300),
            MotorHardware::dshot(MockTransport::new(3)),
        );
        assert_eq!(
            backend.err(),
            Some(ConfigError::TooManyOutputs {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn supported_motors_are_capped() {
        let backend = Backend::<_, Infallible, 12>::select(
            &config(Protocol::Standard),
            9,
            converter(Protocol::Standard),
            MotorHardware::timers([MockPin::new(1000); 12]),
        );
        assert_eq!(
            backend.err(),
            Some(ConfigError::TooManyOutputs {
                requested: 9,
                available: MAX_SUPPORTED_MOTORS
            })
        );
    }

    #[test]
    fn null_backend_refuses_everything() {
        let mut backend = Backend::<NoPins, Infallible, 1>::default();
        assert!(backend.is_null());
        assert!(!backend.enable());
        assert!(!backend.update_start());
        assert!(!backend.is_motor_enabled(0));
    }
}
