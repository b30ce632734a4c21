use embedded_hal::PwmPin;
use embedded_time::rate::Hertz;
use num_traits::PrimInt;

use super::pwm::period_us;
use super::timer::TimerOutputs;
use super::MotorBackend;
use crate::{ConfigError, Converter};

/// Full scale of the brushed native value, in permille of the duty cycle.
const BRUSHED_FULL_SCALE: f32 = 1000.;

/// Duty cycle outputs driving brushed motors through a FET.
pub struct BrushedBackend<P, const N: usize> {
    outputs: TimerOutputs<P, N>,
    converter: Converter,
}

impl<P, const N: usize> BrushedBackend<P, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
{
    pub fn new(
        pins: [P; N],
        count: usize,
        rate: Hertz,
        inverted: bool,
        converter: Converter,
    ) -> Result<Self, ConfigError> {
        // The duty cycle is rate independent but the timer still needs a valid period
        period_us(rate)?;

        let disarm = converter.endpoints().disarm / BRUSHED_FULL_SCALE;
        Ok(Self {
            outputs: TimerOutputs::new(pins, count, disarm, inverted),
            converter,
        })
    }
}

impl<P, const N: usize> MotorBackend for BrushedBackend<P, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
{
    fn convert_external_to_motor(&self, external: u16) -> f32 {
        self.converter.to_motor(external)
    }

    fn convert_motor_to_external(&self, motor: f32) -> u16 {
        self.converter.to_external(motor)
    }

    fn enable(&mut self) -> bool {
        self.outputs.enable();
        true
    }

    fn disable(&mut self) {
        self.outputs.disable();
    }

    fn is_motor_enabled(&self, index: usize) -> bool {
        self.outputs.is_enabled(index)
    }

    fn update_start(&mut self) -> bool {
        true
    }

    fn write(&mut self, index: usize, value: f32) {
        self.outputs.stage(index, value / BRUSHED_FULL_SCALE);
    }

    fn write_int(&mut self, index: usize, value: u16) {
        self.write(index, value as f32);
    }

    fn update_complete(&mut self) {
        self.outputs.commit();
    }

    fn shutdown(&mut self) {
        self.outputs.shutdown();
    }
}
