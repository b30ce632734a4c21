use embedded_hal::PwmPin;
use embedded_time::duration::Microseconds;
use embedded_time::rate::{Hertz, Rate};
use num_traits::PrimInt;

use super::timer::TimerOutputs;
use super::MotorBackend;
use crate::{ConfigError, Converter, Protocol};

/// Pulse width outputs for the Standard, OneShot and MultiShot protocols.
///
/// Native values are pulse widths in microseconds.
pub struct PwmBackend<P, const N: usize> {
    outputs: TimerOutputs<P, N>,
    converter: Converter,
    period_us: f32,
    max_pulse: f32,
}

impl<P, const N: usize> PwmBackend<P, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
{
    pub fn new(
        pins: [P; N],
        count: usize,
        protocol: Protocol,
        rate: Hertz,
        inverted: bool,
        converter: Converter,
    ) -> Result<Self, ConfigError> {
        let spec = protocol.spec();
        let period_us = period_us(rate)?;

        // A pulse must fit inside one period
        if period_us <= spec.max {
            return Err(ConfigError::InvalidRate);
        }

        let disarm = converter.endpoints().disarm / period_us;
        Ok(Self {
            outputs: TimerOutputs::new(pins, count, disarm, inverted),
            converter,
            period_us,
            max_pulse: spec.max,
        })
    }

    pub fn period_us(&self) -> f32 {
        self.period_us
    }

    #[cfg(test)]
    pub(crate) fn pin_duty(&self, index: usize) -> P::Duty {
        self.outputs.pin(index).get_duty()
    }
}

/// Output period of `rate` in microseconds.
pub(crate) fn period_us(rate: Hertz) -> Result<f32, ConfigError> {
    if rate.0 == 0 {
        return Err(ConfigError::InvalidRate);
    }

    let period: Microseconds = rate.to_duration().map_err(|_| ConfigError::InvalidRate)?;
    if period.0 == 0 {
        return Err(ConfigError::InvalidRate);
    }
    Ok(period.0 as f32)
}

impl<P, const N: usize> MotorBackend for PwmBackend<P, N>
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
        let pulse = value.min(self.max_pulse);
        self.outputs.stage(index, pulse / self.period_us);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_endpoints;
    use crate::mock::MockPin;

    fn backend(protocol: Protocol, rate: Hertz) -> Result<PwmBackend<MockPin, 4>, ConfigError> {
        let spec = protocol.spec();
        let converter = Converter::new(compute_endpoints(protocol, spec.idle, 1., None), false);
        PwmBackend::new([MockPin::new(10_000); 4], 4, protocol, rate, false, converter)
    }

    #[test]
    fn period_from_rate() {
        assert_eq!(period_us(Hertz(1_000)), Ok(1000.));
        assert_eq!(period_us(Hertz(480)), Ok(2083.));
        assert_eq!(period_us(Hertz(0)), Err(ConfigError::InvalidRate));
    }

    #[test]
    fn rate_must_fit_pulse() {
        assert!(backend(Protocol::Standard, Hertz(480)).is_ok());
        assert_eq!(
            backend(Protocol::Standard, Hertz(500)).err(),
            Some(ConfigError::InvalidRate)
        );
        assert!(backend(Protocol::OneShot125, Hertz(2_000)).is_ok());
    }

    #[test]
    fn pulse_width_to_duty() {
        let mut pwm = backend(Protocol::Standard, Hertz(400)).unwrap();
        assert_eq!(pwm.period_us(), 2500.);

        assert!(pwm.enable());
        assert!(pwm.update_start());
        pwm.write(0, 1500.);
        pwm.write_int(1, 2000);
        pwm.write(2, 9000.);
        pwm.update_complete();

        // 1500us of a 2500us period on a 10000 tick timer
        assert_eq!(pwm.pin_duty(0), 6000);
        assert_eq!(pwm.pin_duty(1), 8000);
        assert_eq!(pwm.pin_duty(2), 8000);
        // Never written, still at disarm
        assert_eq!(pwm.pin_duty(3), 4000);
    }
}
