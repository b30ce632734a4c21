use embedded_hal::PwmPin;
use num_traits::PrimInt;

use crate::backend::{Backend, MotorBackend};
use crate::fmt::{debug, info, warn};
use crate::hal::{DshotTransport, MotorHardware};
use crate::{compute_endpoints, Config3d, ConfigError, Converter, Endpoints, Error, MotorDevConfig, Protocol};

/// The motor output subsystem.
///
/// A device starts uninitialized. [`init`](Self::init) selects the backend for the
/// configured protocol, after which each control cycle is
/// [`update_start`](Self::update_start), one [`write`](Self::write) per output and
/// [`update_complete`](Self::update_complete). Nothing written in a cycle reaches the
/// outputs before the cycle completes.
///
/// [`shutdown`](Self::shutdown) can be called from any state and always leaves the
/// outputs stopped.
pub struct MotorDevice<P, T, const N: usize> {
    backend: Backend<P, T, N>,
    protocol: Option<Protocol>,
    idle: u16,
    mode_3d: Option<Config3d>,
    converter: Converter,
    count: usize,
    initialized: bool,
    enabled: bool,
    in_cycle: bool,
}

impl<P, T, const N: usize> Default for MotorDevice<P, T, N> {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            protocol: None,
            idle: 0,
            mode_3d: None,
            converter: Converter::default(),
            count: 0,
            initialized: false,
            enabled: false,
            in_cycle: false,
        }
    }
}

impl<P, T, const N: usize> MotorDevice<P, T, N>
where
    P: PwmPin,
    P::Duty: PrimInt,
    T: DshotTransport,
{
    /// Create an uninitialized device.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring up `count` outputs on `hardware`.
    ///
    /// `idle_pulse` is the native output for a zero command.
    /// Any previous configuration is shut down first. On error the device is left
    /// uninitialized and must not be flown.
    pub fn init(
        &mut self,
        config: &MotorDevConfig,
        idle_pulse: u16,
        count: usize,
        hardware: MotorHardware<P, T, N>,
    ) -> Result<(), Error> {
        self.reset();

        match self.try_init(config, idle_pulse, count, hardware) {
            Ok(()) => {
                info!("motor: {} outputs of {}", count, config.protocol);
                Ok(())
            }
            Err(error) => {
                warn!("motor: init failed, {}", error);
                Err(error.into())
            }
        }
    }

    fn try_init(
        &mut self,
        config: &MotorDevConfig,
        idle_pulse: u16,
        count: usize,
        hardware: MotorHardware<P, T, N>,
    ) -> Result<(), ConfigError> {
        let protocol = config.protocol;
        let spec = protocol.spec();

        if (idle_pulse as f32) < spec.disarm || idle_pulse as f32 >= spec.max {
            return Err(ConfigError::IdlePulseOutOfRange {
                idle: idle_pulse,
                min: spec.disarm as u16,
                max: spec.max as u16,
            });
        }

        if let Some(mode_3d) = &config.mode_3d {
            if !spec.supports_3d {
                return Err(ConfigError::Unsupported3d(protocol));
            }
            mode_3d.validate()?;
        }

        let endpoints = compute_endpoints(
            protocol,
            idle_pulse,
            config.output_limit,
            config.mode_3d.as_ref(),
        );
        let converter = Converter::new(endpoints, config.mode_3d.is_some());
        self.backend = Backend::select(config, count, converter, hardware)?;

        self.protocol = Some(protocol);
        self.idle = idle_pulse;
        self.mode_3d = config.mode_3d;
        self.converter = converter;
        self.count = count;
        self.initialized = true;
        Ok(())
    }

    /// Stop the current backend and fall back to the null backend.
    fn reset(&mut self) {
        self.backend.shutdown();
        self.backend = Backend::default();
        self.protocol = None;
        self.converter = Converter::default();
        self.count = 0;
        self.initialized = false;
        self.enabled = false;
        self.in_cycle = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Start generating output at the disarm value.
    pub fn enable(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if self.enabled {
            return Ok(());
        }
        if !self.backend.enable() {
            warn!("motor: backend failed to start");
            return Err(Error::NotReady);
        }

        info!("motor: enabled");
        self.enabled = true;
        Ok(())
    }

    /// Stop generating output. Any open cycle is dropped.
    pub fn disable(&mut self) {
        self.backend.disable();
        if self.enabled {
            info!("motor: disabled");
        }
        self.enabled = false;
        self.in_cycle = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_motor_enabled(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.backend.is_motor_enabled(index))
    }

    /// Open a new output cycle.
    ///
    /// Returns [`Error::NotReady`] while the device is disabled, a cycle is already open or
    /// the hardware is still busy with the previous one. The caller should skip this
    /// control loop tick and try again on the next.
    pub fn update_start(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if !self.enabled || self.in_cycle || !self.backend.update_start() {
            debug!("motor: cycle rejected");
            return Err(Error::NotReady);
        }

        self.in_cycle = true;
        Ok(())
    }

    /// Stage a normalized command for output `index`.
    ///
    /// Commands are `0 ~ 1`, or `-1 ~ 1` for bidirectional outputs, and are constrained
    /// to that range.
    pub fn write(&mut self, index: usize, value: f32) -> Result<(), Error> {
        self.check_write(index)?;
        self.backend.write(index, self.converter.to_native(value));
        Ok(())
    }

    /// Stage an exact native value for output `index`.
    pub fn write_int(&mut self, index: usize, value: u16) -> Result<(), Error> {
        self.check_write(index)?;
        self.backend.write_int(index, value);
        Ok(())
    }

    /// Stage one normalized command per output.
    ///
    /// `values` must hold exactly one command per output, otherwise nothing is staged.
    pub fn write_all(&mut self, values: &[f32]) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if values.len() != self.count {
            return Err(Error::CountMismatch {
                expected: self.count,
                actual: values.len(),
            });
        }
        self.check_cycle()?;

        for (index, value) in values.iter().enumerate() {
            self.backend.write(index, self.converter.to_native(*value));
        }
        Ok(())
    }

    /// Send the staged values of the open cycle to the outputs.
    pub fn update_complete(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        self.check_cycle()?;

        self.backend.update_complete();
        self.in_cycle = false;
        Ok(())
    }

    /// Stop every output immediately.
    ///
    /// Safe to call from any state, including the middle of a cycle. The device must be
    /// initialized again before it can drive outputs.
    pub fn shutdown(&mut self) {
        if self.initialized {
            warn!("motor: shutdown");
        }
        self.backend.shutdown();
        self.enabled = false;
        self.in_cycle = false;
        self.initialized = false;
    }

    /// The configured protocol, once an init has succeeded.
    pub fn protocol(&self) -> Option<Protocol> {
        self.protocol
    }

    pub fn is_protocol_dshot(&self) -> bool {
        self.protocol.map_or(false, Protocol::is_dshot)
    }

    pub fn output_count(&self) -> usize {
        self.count
    }

    /// The endpoints commands are mapped onto.
    pub fn endpoints(&self) -> &Endpoints {
        self.converter.endpoints()
    }

    /// Endpoints of the configured protocol for another output limit.
    pub fn endpoints_for(&self, output_limit: f32) -> Option<Endpoints> {
        let protocol = self.protocol?;
        Some(compute_endpoints(
            protocol,
            self.idle,
            output_limit,
            self.mode_3d.as_ref(),
        ))
    }

    /// Map a native protocol value to a normalized command.
    pub fn convert_from_external(&self, external: u16) -> f32 {
        self.backend.convert_external_to_motor(external)
    }

    /// Map a normalized command to a native protocol value.
    pub fn convert_to_external(&self, motor: f32) -> u16 {
        self.backend.convert_motor_to_external(motor)
    }

    pub fn backend(&self) -> &Backend<P, T, N> {
        &self.backend
    }

    fn check_index(&self, index: usize) -> Result<(), Error> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if index >= self.count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(())
    }

    fn check_cycle(&self) -> Result<(), Error> {
        if self.enabled && self.in_cycle {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn check_write(&self, index: usize) -> Result<(), Error> {
        self.check_index(index)?;
        self.check_cycle()
    }
}
