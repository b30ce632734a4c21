use super::MotorBackend;

/// Backend of an uninitialized device. Nothing reaches the hardware.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBackend;

impl MotorBackend for NullBackend {
    fn convert_external_to_motor(&self, _external: u16) -> f32 {
        0.
    }

    fn convert_motor_to_external(&self, _motor: f32) -> u16 {
        0
    }

    fn enable(&mut self) -> bool {
        false
    }

    fn disable(&mut self) {}

    fn is_motor_enabled(&self, _index: usize) -> bool {
        false
    }

    fn update_start(&mut self) -> bool {
        false
    }

    fn write(&mut self, _index: usize, _value: f32) {}

    fn write_int(&mut self, _index: usize, _value: u16) {}

    fn update_complete(&mut self) {}

    fn shutdown(&mut self) {}
}
