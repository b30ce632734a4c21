use num_traits::Float;

use super::MotorBackend;
use crate::hal::DshotTransport;
use crate::protocol::{DSHOT_CMD_MOTOR_STOP, DSHOT_MAX_THROTTLE};
use crate::Converter;

/// Digital outputs for the DShot and Proshot protocols.
///
/// Values are staged per output and handed to the transport as one frame, so either
/// every output of a cycle is sent or none is.
pub struct DshotBackend<T, const N: usize> {
    transport: T,
    count: usize,
    staged: [u16; N],
    converter: Converter,
    enabled: bool,
}

impl<T, const N: usize> DshotBackend<T, N>
where
    T: DshotTransport,
{
    pub fn new(transport: T, count: usize, converter: Converter) -> Self {
        Self {
            transport,
            count: count.min(N),
            staged: [DSHOT_CMD_MOTOR_STOP; N],
            converter,
            enabled: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

impl<T, const N: usize> MotorBackend for DshotBackend<T, N>
where
    T: DshotTransport,
{
    fn convert_external_to_motor(&self, external: u16) -> f32 {
        self.converter.to_motor(external)
    }

    fn convert_motor_to_external(&self, motor: f32) -> u16 {
        self.converter.to_external(motor)
    }

    fn enable(&mut self) -> bool {
        self.staged = [DSHOT_CMD_MOTOR_STOP; N];
        self.enabled = self.transport.enable();
        self.enabled
    }

    fn disable(&mut self) {
        self.transport.disable();
        self.enabled = false;
    }

    fn is_motor_enabled(&self, index: usize) -> bool {
        self.enabled && index < self.count
    }

    fn update_start(&mut self) -> bool {
        !self.transport.is_busy()
    }

    fn write(&mut self, index: usize, value: f32) {
        let value = Float::round(value.max(0.)) as u16;
        self.write_int(index, value);
    }

    fn write_int(&mut self, index: usize, value: u16) {
        if let Some(staged) = self.staged[..self.count].get_mut(index) {
            *staged = value.min(DSHOT_MAX_THROTTLE);
        }
    }

    fn update_complete(&mut self) {
        if self.enabled {
            self.transport.transmit(&self.staged[..self.count]);
        }
    }

    fn shutdown(&mut self) {
        self.transport.abort();
        self.transport.disable();
        self.staged = [DSHOT_CMD_MOTOR_STOP; N];
        self.enabled = false;
    }
}
