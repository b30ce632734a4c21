//! Hardware seams the motor outputs are driven through.
//!
//! Timer driven protocols use [`embedded_hal::PwmPin`] directly.
//! Digital protocols are handed to a [`DshotTransport`], which owns the timer and DMA
//! programming and the bit level encoding of each frame.

use core::convert::Infallible;

use embedded_hal::PwmPin;

/// DMA backed transmitter of digital motor frames.
pub trait DshotTransport {
    /// Number of outputs the transport can drive.
    fn channels(&self) -> usize;

    /// Start the output lines. Returns `false` if the hardware could not be started.
    fn enable(&mut self) -> bool;

    /// Stop generating frames.
    fn disable(&mut self);

    /// Returns `true` while the previous frame is still being transmitted.
    fn is_busy(&self) -> bool;

    /// Encode and transmit one value per output in a single burst.
    fn transmit(&mut self, values: &[u16]);

    /// Abort any transmission in flight and hold the lines low.
    fn abort(&mut self);
}

/// A transport for boards without digital output support.
impl DshotTransport for Infallible {
    fn channels(&self) -> usize {
        match *self {}
    }

    fn enable(&mut self) -> bool {
        match *self {}
    }

    fn disable(&mut self) {
        match *self {}
    }

    fn is_busy(&self) -> bool {
        match *self {}
    }

    fn transmit(&mut self, _values: &[u16]) {
        match *self {}
    }

    fn abort(&mut self) {
        match *self {}
    }
}

/// A timer output for boards that only drive digital protocols.
#[derive(Debug)]
pub enum NoPins {}

impl PwmPin for NoPins {
    type Duty = u16;

    fn disable(&mut self) {
        match *self {}
    }

    fn enable(&mut self) {
        match *self {}
    }

    fn get_duty(&self) -> Self::Duty {
        match *self {}
    }

    fn get_max_duty(&self) -> Self::Duty {
        match *self {}
    }

    fn set_duty(&mut self, _duty: Self::Duty) {
        match *self {}
    }
}

/// The output hardware handed to the motor device at init.
pub enum MotorHardware<P, T, const N: usize> {
    /// Timer channels for the analog and brushed protocols.
    Timers([P; N]),
    /// A transport for the digital protocols.
    Dshot(T),
}

impl<P, const N: usize> MotorHardware<P, Infallible, N> {
    pub fn timers(pins: [P; N]) -> Self {
        MotorHardware::Timers(pins)
    }
}

impl<T, const N: usize> MotorHardware<NoPins, T, N> {
    pub fn dshot(transport: T) -> Self {
        MotorHardware::Dshot(transport)
    }
}

/// Result of one ID detect conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdSample {
    /// Raw 12 bit reading of the ID divider.
    pub id_detect: u16,
    /// Raw 12 bit reading of the internal reference.
    pub vrefint: u16,
}

/// ADC sequence sampling the hardware ID divider together with the internal reference.
pub trait IdDetectAdc {
    /// Configure the pin and converter and power up the internal reference.
    fn init(&mut self);

    /// Run one conversion of both channels, blocking until it completes.
    fn convert(&mut self) -> IdSample;

    /// Release the converter and return the pin to an input.
    fn deinit(&mut self);
}
