//! Recording hardware for tests.

use embedded_hal::PwmPin;

use crate::hal::{DshotTransport, IdDetectAdc, IdSample};

#[derive(Clone, Copy, Debug)]
pub struct MockPin {
    pub duty: u16,
    pub max: u16,
    pub enabled: bool,
    pub writes: usize,
}

impl MockPin {
    pub fn new(max: u16) -> Self {
        Self {
            duty: 0,
            max,
            enabled: false,
            writes: 0,
        }
    }
}

impl PwmPin for MockPin {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn get_duty(&self) -> u16 {
        self.duty
    }

    fn get_max_duty(&self) -> u16 {
        self.max
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
        self.writes += 1;
    }
}

#[derive(Debug)]
pub struct MockTransport {
    pub channels: usize,
    pub enabled: bool,
    pub busy: bool,
    pub fail_enable: bool,
    pub aborted: bool,
    pub frames: usize,
    pub last: [u16; 8],
}

impl MockTransport {
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            enabled: false,
            busy: false,
            fail_enable: false,
            aborted: false,
            frames: 0,
            last: [0; 8],
        }
    }
}

impl DshotTransport for MockTransport {
    fn channels(&self) -> usize {
        self.channels
    }

    fn enable(&mut self) -> bool {
        self.enabled = !self.fail_enable;
        self.enabled
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn transmit(&mut self, values: &[u16]) {
        self.last[..values.len()].copy_from_slice(values);
        self.frames += 1;
    }

    fn abort(&mut self) {
        self.aborted = true;
        self.busy = false;
    }
}

/// Replays the same reading for every conversion.
#[derive(Debug, Default)]
pub struct MockAdc {
    pub sample: IdSample,
    pub conversions: usize,
    pub initialized: bool,
    pub released: bool,
}

impl MockAdc {
    pub fn new(id_detect: u16, vrefint: u16) -> Self {
        Self {
            sample: IdSample { id_detect, vrefint },
            ..Self::default()
        }
    }
}

impl IdDetectAdc for MockAdc {
    fn init(&mut self) {
        self.initialized = true;
    }

    fn convert(&mut self) -> IdSample {
        self.conversions += 1;
        self.sample
    }

    fn deinit(&mut self) {
        self.released = true;
    }
}

/// Counts the microseconds waited.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub waited_us: u32,
}

impl embedded_hal::blocking::delay::DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.waited_us += us;
    }
}
