use embedded_time::rate::Hertz;

use crate::protocol::{ProtocolKind, DSHOT_MAX_THROTTLE, DSHOT_MIN_THROTTLE, PWM_RANGE_MIN};
use crate::{constrain, ConfigError, Protocol};

/// Default refresh rate of the analog protocols.
pub const DEFAULT_PWM_RATE: Hertz = Hertz(480);

/// Default duty cycle frequency of brushed motors.
pub const BRUSHED_PWM_RATE: Hertz = Hertz(16_000);

/// Bidirectional (3D) throttle settings in standard PWM microseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config3d {
    /// Output that stops the motor.
    pub neutral: u16,
    /// Total width of the deadband around `neutral`.
    pub deadband_width: u16,
    /// Full reverse.
    pub limit_low: u16,
    /// Full forward.
    pub limit_high: u16,
}

impl Default for Config3d {
    fn default() -> Self {
        Self {
            neutral: 1460,
            deadband_width: 108,
            limit_low: 1000,
            limit_high: 2000,
        }
    }
}

impl Config3d {
    /// Check that neutral lies strictly inside the limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit_low < self.neutral && self.neutral < self.limit_high {
            Ok(())
        } else {
            Err(ConfigError::InvalidNeutral)
        }
    }
}

/// Boot time configuration of the motor outputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorDevConfig {
    pub protocol: Protocol,
    /// Refresh rate of the timer driven protocols.
    pub pwm_rate: Hertz,
    /// Invert the timer outputs.
    pub inverted: bool,
    /// Fraction of the throttle range available, 0 ~ 1.
    pub output_limit: f32,
    pub mode_3d: Option<Config3d>,
    /// Lowest armed throttle of the analog protocols in standard PWM microseconds.
    pub min_throttle: u16,
    /// Idle of the digital protocols as a percentage of the throttle range.
    pub digital_idle_offset: f32,
}

impl Default for MotorDevConfig {
    fn default() -> Self {
        Self {
            protocol: Protocol::OneShot125,
            pwm_rate: DEFAULT_PWM_RATE,
            inverted: false,
            output_limit: 1.,
            mode_3d: None,
            min_throttle: 1070,
            digital_idle_offset: 5.5,
        }
    }
}

impl MotorDevConfig {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The idle pulse (in native units) matching this configuration.
    ///
    /// ```
    /// use embedded_flight_motors::{MotorDevConfig, Protocol};
    ///
    /// let config = MotorDevConfig::builder().protocol(Protocol::Standard).build();
    /// assert_eq!(config.default_idle_pulse(), 1070);
    ///
    /// let config = MotorDevConfig::builder().protocol(Protocol::DShot600).build();
    /// assert_eq!(config.default_idle_pulse(), 158);
    /// ```
    pub fn default_idle_pulse(&self) -> u16 {
        let spec = self.protocol.spec();
        match spec.kind {
            ProtocolKind::Analog => {
                let fraction = (self.min_throttle as f32 - PWM_RANGE_MIN as f32) / 1000.;
                let idle = spec.min + constrain(fraction, 0., 1.) * spec.span();
                num_traits::Float::round(idle) as u16
            }
            ProtocolKind::Brushed => 0,
            ProtocolKind::Digital => {
                let range = (DSHOT_MAX_THROTTLE - DSHOT_MIN_THROTTLE) as f32;
                let offset = constrain(self.digital_idle_offset, 0., 100.) / 100. * range;
                DSHOT_MIN_THROTTLE + num_traits::Float::round(offset) as u16
            }
        }
    }
}

/// Builder for [`MotorDevConfig`].
pub struct Builder {
    config: MotorDevConfig,
    rate: Option<Hertz>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            config: MotorDevConfig::default(),
            rate: None,
        }
    }
}

impl Builder {
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn rate(mut self, rate: Hertz) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.config.inverted = inverted;
        self
    }

    pub fn output_limit(mut self, output_limit: f32) -> Self {
        self.config.output_limit = output_limit;
        self
    }

    pub fn mode_3d(mut self, mode_3d: Config3d) -> Self {
        self.config.mode_3d = Some(mode_3d);
        self
    }

    pub fn min_throttle(mut self, min_throttle: u16) -> Self {
        self.config.min_throttle = min_throttle;
        self
    }

    pub fn digital_idle_offset(mut self, percent: f32) -> Self {
        self.config.digital_idle_offset = percent;
        self
    }

    pub fn build(self) -> MotorDevConfig {
        let default_rate = match self.config.protocol {
            Protocol::Brushed => BRUSHED_PWM_RATE,
            _ => DEFAULT_PWM_RATE,
        };

        MotorDevConfig {
            pwm_rate: self.rate.unwrap_or(default_rate),
            ..self.config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brushed_defaults_to_fast_rate() {
        let config = MotorDevConfig::builder().protocol(Protocol::Brushed).build();
        assert_eq!(config.pwm_rate, BRUSHED_PWM_RATE);

        let config = MotorDevConfig::builder()
            .protocol(Protocol::Brushed)
            .rate(Hertz(8_000u32))
            .build();
        assert_eq!(config.pwm_rate, Hertz(8_000u32));
    }

    #[test]
    fn idle_pulse_scales_onto_protocol() {
        let config = MotorDevConfig::builder().build();
        assert_eq!(config.protocol, Protocol::OneShot125);
        assert_eq!(config.default_idle_pulse(), 134);

        let config = MotorDevConfig::builder()
            .protocol(Protocol::Standard)
            .min_throttle(1100)
            .build();
        assert_eq!(config.default_idle_pulse(), 1100);

        let config = MotorDevConfig::builder().protocol(Protocol::Brushed).build();
        assert_eq!(config.default_idle_pulse(), 0);
    }

    #[test]
    fn neutral_inside_limits() {
        assert_eq!(Config3d::default().validate(), Ok(()));

        let config = Config3d {
            neutral: 2000,
            ..Config3d::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidNeutral));
    }

    #[test]
    fn digital_idle_offset_is_clamped() {
        let config = MotorDevConfig::builder()
            .protocol(Protocol::DShot300)
            .digital_idle_offset(0.)
            .build();
        assert_eq!(config.default_idle_pulse(), DSHOT_MIN_THROTTLE);

        let config = MotorDevConfig::builder()
            .protocol(Protocol::DShot300)
            .digital_idle_offset(250.)
            .build();
        assert_eq!(config.default_idle_pulse(), DSHOT_MAX_THROTTLE);
    }
}
