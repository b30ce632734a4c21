use embedded_hal::PwmPin;
use num_traits::{Float, NumCast, PrimInt, Zero};

use crate::constrain;

/// Timer channels with a staged duty cycle per output.
///
/// Duty cycles are fractions of the timer period and only reach the pins in [`commit`](Self::commit).
pub struct TimerOutputs<P, const N: usize> {
    pins: [P; N],
    count: usize,
    staged: [f32; N],
    disarm: f32,
    inverted: bool,
    enabled: bool,
}

impl<P, const N: usize> TimerOutputs<P, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
{
    /// Drive the first `count` pins, idling at the `disarm` duty cycle.
    pub fn new(pins: [P; N], count: usize, disarm: f32, inverted: bool) -> Self {
        Self {
            pins,
            count: count.min(N),
            staged: [disarm; N],
            disarm,
            inverted,
            enabled: false,
        }
    }

    #[cfg(test)]
    pub fn pin(&self, index: usize) -> &P {
        &self.pins[index]
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled && index < self.count
    }

    /// Start the outputs at the disarm duty cycle.
    pub fn enable(&mut self) {
        self.staged = [self.disarm; N];
        for index in 0..self.count {
            self.set(index, self.disarm);
            self.pins[index].enable();
        }
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        for pin in &mut self.pins[..self.count] {
            pin.disable();
        }
        self.enabled = false;
    }

    pub fn stage(&mut self, index: usize, fraction: f32) {
        if let Some(staged) = self.staged[..self.count].get_mut(index) {
            *staged = fraction;
        }
    }

    /// Write every staged duty cycle to its pin.
    pub fn commit(&mut self) {
        if !self.enabled {
            return;
        }
        for index in 0..self.count {
            self.set(index, self.staged[index]);
        }
    }

    /// Stop all pulses and drop the staged values.
    pub fn shutdown(&mut self) {
        for pin in &mut self.pins[..self.count] {
            let duty = duty_from_fraction(pin.get_max_duty(), 0., self.inverted);
            pin.set_duty(duty);
            pin.disable();
        }
        self.staged = [self.disarm; N];
        self.enabled = false;
    }

    fn set(&mut self, index: usize, fraction: f32) {
        let pin = &mut self.pins[index];
        let duty = duty_from_fraction(pin.get_max_duty(), fraction, self.inverted);
        pin.set_duty(duty);
    }
}

/// Convert a duty cycle fraction to timer ticks.
pub fn duty_from_fraction<D: PrimInt>(max: D, fraction: f32, inverted: bool) -> D {
    let fraction = constrain(fraction, 0., 1.);
    let fraction = if inverted { 1. - fraction } else { fraction };

    let max_ticks = max.to_f32().unwrap_or(0.);
    <D as NumCast>::from(Float::round(fraction * max_ticks)).unwrap_or_else(<D as Zero>::zero)
}
