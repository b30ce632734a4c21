use crate::protocol::PWM_RANGE_MIN;
use crate::{constrain, Config3d, Protocol};

/// The native output range for a protocol and output limit.
///
/// For every limit `output_low <= deadband_low <= disarm <= deadband_high <= output_high`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoints {
    /// Lowest value ever written to the output.
    pub output_low: f32,
    /// Output for a normalized command of zero.
    pub output_idle: f32,
    /// Output for a normalized command of one.
    pub output_high: f32,
    /// Output while disarmed.
    pub disarm: f32,
    /// Upper edge of the bidirectional deadband.
    pub deadband_high: f32,
    /// Lower edge of the bidirectional deadband.
    pub deadband_low: f32,
}

/// Compute the native endpoints of `protocol`.
///
/// `idle` is the armed idle in native units and `output_limit` the fraction (0 ~ 1)
/// of the throttle range that may be used.
/// Passing a 3D configuration computes bidirectional endpoints around its neutral.
///
/// ```
/// use embedded_flight_motors::{compute_endpoints, Protocol};
///
/// let endpoints = compute_endpoints(Protocol::Standard, 1000, 0.5, None);
/// assert_eq!(endpoints.output_high, 1500.);
/// assert_eq!(endpoints.disarm, 1000.);
/// ```
pub fn compute_endpoints(
    protocol: Protocol,
    idle: u16,
    output_limit: f32,
    mode_3d: Option<&Config3d>,
) -> Endpoints {
    let spec = protocol.spec();
    let limit = constrain(output_limit, 0., 1.);

    if let Some(config) = mode_3d {
        // Settings are in standard PWM microseconds
        let scale = |us: u16| spec.min + (us as f32 - PWM_RANGE_MIN as f32) / 1000. * spec.span();

        let limit_low = constrain(scale(config.limit_low), spec.min, spec.max);
        let limit_high = constrain(scale(config.limit_high), limit_low, spec.max);
        let neutral = constrain(scale(config.neutral), limit_low, limit_high);
        let output_low = neutral - limit * (neutral - limit_low);
        let output_high = neutral + limit * (limit_high - neutral);

        // Same width on both sides, bounded by the narrower side
        let half_width = (config.deadband_width as f32 / 2000. * spec.span())
            .min(neutral - output_low)
            .min(output_high - neutral);

        Endpoints {
            output_low,
            output_idle: neutral,
            output_high,
            disarm: neutral,
            deadband_high: neutral + half_width,
            deadband_low: neutral - half_width,
        }
    } else {
        let idle = constrain(idle as f32, spec.disarm, spec.max);

        Endpoints {
            output_low: spec.disarm,
            output_idle: idle,
            output_high: idle + limit * (spec.max - idle),
            disarm: spec.disarm,
            deadband_high: spec.disarm,
            deadband_low: spec.disarm,
        }
    }
}

impl Endpoints {
    /// Size of the armed output range.
    pub fn range(&self) -> f32 {
        self.output_high - self.output_idle
    }

    /// Returns `true` if `value` lies inside the output range.
    pub fn contains(&self, value: f32) -> bool {
        (self.output_low..=self.output_high).contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_ordered(e: &Endpoints) {
        assert!(e.output_low <= e.deadband_low, "{:?}", e);
        assert!(e.deadband_low <= e.disarm, "{:?}", e);
        assert!(e.disarm <= e.deadband_high, "{:?}", e);
        assert!(e.deadband_high <= e.output_high, "{:?}", e);
    }

    #[test]
    fn standard_pwm() {
        let e = compute_endpoints(Protocol::Standard, 1070, 1., None);
        assert_eq!(e.output_low, 1000.);
        assert_eq!(e.output_idle, 1070.);
        assert_eq!(e.output_high, 2000.);
        assert_eq!(e.disarm, 1000.);

        let e = compute_endpoints(Protocol::Standard, 1000, 0.8, None);
        assert_abs_diff_eq!(e.output_high, 1800., epsilon = 1e-3);
    }

    #[test]
    fn oneshot_and_dshot_ranges() {
        let e = compute_endpoints(Protocol::OneShot125, 125, 1., None);
        assert_eq!((e.output_idle, e.output_high), (125., 250.));

        let e = compute_endpoints(Protocol::DShot600, 48, 1., None);
        assert_eq!((e.output_idle, e.output_high), (48., 2047.));
        assert_eq!(e.disarm, 0.);
    }

    #[test]
    fn high_is_monotonic_in_limit() {
        for protocol in Protocol::ALL {
            let idle = protocol.spec().idle;
            let mut last = f32::MIN;
            for step in 0..=20 {
                let e = compute_endpoints(protocol, idle, step as f32 / 20., None);
                assert_ordered(&e);
                assert!(e.output_high >= last, "{} at {}", protocol, step);
                last = e.output_high;
            }
        }
    }

    #[test]
    fn limit_is_constrained() {
        let over = compute_endpoints(Protocol::Standard, 1000, 3., None);
        assert_eq!(over.output_high, 2000.);

        let under = compute_endpoints(Protocol::Standard, 1000, -1., None);
        assert_eq!(under.output_high, 1000.);

        let nan = compute_endpoints(Protocol::Standard, 1000, f32::NAN, None);
        assert_abs_diff_eq!(nan.output_high, 1500., epsilon = 1e-3);
    }

    #[test]
    fn deadband_straddles_neutral() {
        let config = Config3d::default();
        let e = compute_endpoints(Protocol::Standard, 1000, 1., Some(&config));
        assert_eq!(e.disarm, 1460.);
        assert_eq!(e.deadband_low, 1406.);
        assert_eq!(e.deadband_high, 1514.);
        assert_eq!((e.output_low, e.output_high), (1000., 2000.));

        for step in 0..=10 {
            let e = compute_endpoints(Protocol::Standard, 1000, step as f32 / 10., Some(&config));
            assert_ordered(&e);
            assert_abs_diff_eq!(
                e.disarm - e.deadband_low,
                e.deadband_high - e.disarm,
                epsilon = 1e-3
            );
        }
    }

    #[test]
    fn deadband_shrinks_with_narrow_limit() {
        let e = compute_endpoints(Protocol::Standard, 1000, 0.1, Some(&Config3d::default()));
        assert_abs_diff_eq!(e.output_low, 1414., epsilon = 1e-3);
        assert_abs_diff_eq!(e.output_high, 1514., epsilon = 1e-3);
        assert_abs_diff_eq!(e.deadband_low, 1414., epsilon = 1e-3);
        assert_abs_diff_eq!(e.deadband_high, 1506., epsilon = 1e-3);

        let zero = compute_endpoints(Protocol::Standard, 1000, 0., Some(&Config3d::default()));
        assert_eq!(zero.deadband_low, zero.disarm);
        assert_eq!(zero.deadband_high, zero.disarm);
    }

    #[test]
    fn deadband_scales_onto_oneshot() {
        let e = compute_endpoints(Protocol::OneShot125, 125, 1., Some(&Config3d::default()));
        assert_abs_diff_eq!(e.disarm, 182.5, epsilon = 1e-3);
        assert_abs_diff_eq!(e.deadband_high - e.deadband_low, 13.5, epsilon = 1e-3);
    }
}
