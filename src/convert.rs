use num_traits::Float;

use crate::{constrain, Endpoints};

/// Maps between normalized motor commands and native protocol values.
///
/// Unidirectional outputs take commands in `0 ~ 1` where zero is idle.
/// Bidirectional (3D) outputs take `-1 ~ 1` where zero is neutral and the sign selects
/// the side of the deadband.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Converter {
    endpoints: Endpoints,
    bidirectional: bool,
}

impl Converter {
    pub fn new(endpoints: Endpoints, bidirectional: bool) -> Self {
        Self {
            endpoints,
            bidirectional,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Lowest normalized command.
    pub fn min_command(&self) -> f32 {
        if self.bidirectional {
            -1.
        } else {
            0.
        }
    }

    /// Constrain a command to the normalized domain. Non finite commands become zero.
    pub fn constrain(&self, motor: f32) -> f32 {
        if !motor.is_finite() {
            return 0.;
        }
        constrain(motor, self.min_command(), 1.)
    }

    /// Map a normalized command to its native value without quantizing.
    ///
    /// ```
    /// use embedded_flight_motors::{compute_endpoints, Converter, Protocol};
    ///
    /// let converter = Converter::new(compute_endpoints(Protocol::Standard, 1000, 1., None), false);
    /// assert_eq!(converter.to_native(0.5), 1500.);
    /// ```
    pub fn to_native(&self, motor: f32) -> f32 {
        let motor = self.constrain(motor);
        let e = &self.endpoints;

        if !self.bidirectional {
            e.output_idle + motor * (e.output_high - e.output_idle)
        } else if motor > 0. {
            e.deadband_high + motor * (e.output_high - e.deadband_high)
        } else if motor < 0. {
            e.deadband_low + motor * (e.deadband_low - e.output_low)
        } else {
            e.disarm
        }
    }

    /// Map a normalized command to the protocol's integer representation.
    pub fn to_external(&self, motor: f32) -> u16 {
        Float::round(self.to_native(motor)) as u16
    }

    /// Map a native value back to a normalized command.
    ///
    /// Values below idle, or inside the 3D deadband, are a zero command.
    pub fn to_motor(&self, external: u16) -> f32 {
        let value = external as f32;
        let e = &self.endpoints;

        let motor = if !self.bidirectional {
            ratio(value - e.output_idle, e.output_high - e.output_idle)
        } else if value > e.deadband_high {
            ratio(value - e.deadband_high, e.output_high - e.deadband_high)
        } else if value < e.deadband_low {
            -ratio(e.deadband_low - value, e.deadband_low - e.output_low)
        } else {
            0.
        };

        self.constrain(motor)
    }
}

fn ratio(offset: f32, range: f32) -> f32 {
    if range > 0. {
        offset / range
    } else {
        0.
    }
}
