//! Output protocols and their native value ranges.

use core::fmt;

use crate::ConfigError;

/// Lowest throttle value of the digital protocols. Values below are commands.
pub const DSHOT_MIN_THROTTLE: u16 = 48;

/// Highest value of the 11 bit digital value space.
pub const DSHOT_MAX_THROTTLE: u16 = 2047;

/// Digital command that stops the motor.
pub const DSHOT_CMD_MOTOR_STOP: u16 = 0;

/// Standard servo pulse range (in microseconds) that analog settings are expressed in.
pub const PWM_RANGE_MIN: u16 = 1000;
pub const PWM_RANGE_MAX: u16 = 2000;

/// The signalling family a protocol belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolKind {
    /// Pulse width modulated ESC signal, native unit is microseconds.
    Analog,
    /// Direct duty cycle drive of a brushed motor, native unit is permille.
    Brushed,
    /// Digital frames, native unit is the 11 bit value.
    Digital,
}

/// Static description of a protocol.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolSpec {
    pub kind: ProtocolKind,
    /// Floor of the native value space.
    pub min: f32,
    /// Full throttle.
    pub max: f32,
    /// Value sent while disarmed.
    pub disarm: f32,
    /// Armed idle used when the caller has no better value.
    pub idle: u16,
    /// Whether the protocol can run bidirectional (3D) outputs.
    pub supports_3d: bool,
    /// Bit rate in kbit/s for digital protocols, zero otherwise.
    pub bitrate_kbps: u16,
}

impl ProtocolSpec {
    const fn analog(min: f32, max: f32, idle: u16) -> Self {
        Self {
            kind: ProtocolKind::Analog,
            min,
            max,
            disarm: min,
            idle,
            supports_3d: true,
            bitrate_kbps: 0,
        }
    }

    const fn digital(bitrate_kbps: u16) -> Self {
        Self {
            kind: ProtocolKind::Digital,
            min: DSHOT_CMD_MOTOR_STOP as f32,
            max: DSHOT_MAX_THROTTLE as f32,
            disarm: DSHOT_CMD_MOTOR_STOP as f32,
            idle: DSHOT_MIN_THROTTLE,
            supports_3d: false,
            bitrate_kbps,
        }
    }

    /// Width of the native value space.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

static SPECS: [ProtocolSpec; Protocol::COUNT] = [
    // Standard
    ProtocolSpec::analog(1000., 2000., 1070),
    // OneShot125
    ProtocolSpec::analog(125., 250., 134),
    // OneShot42
    ProtocolSpec::analog(42., 84., 45),
    // MultiShot
    ProtocolSpec::analog(5., 25., 6),
    // Brushed
    ProtocolSpec {
        kind: ProtocolKind::Brushed,
        min: 0.,
        max: 1000.,
        disarm: 0.,
        idle: 0,
        supports_3d: false,
        bitrate_kbps: 0,
    },
    ProtocolSpec::digital(150),
    ProtocolSpec::digital(300),
    ProtocolSpec::digital(600),
    ProtocolSpec::digital(1200),
    ProtocolSpec::digital(1000),
];

/// Motor output protocol.
///
/// The discriminants are the ids stored in persistent configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Protocol {
    Standard = 0,
    OneShot125,
    OneShot42,
    MultiShot,
    Brushed,
    DShot150,
    DShot300,
    DShot600,
    DShot1200,
    Proshot1000,
}

impl Protocol {
    pub const COUNT: usize = 10;

    pub const ALL: [Protocol; Protocol::COUNT] = [
        Protocol::Standard,
        Protocol::OneShot125,
        Protocol::OneShot42,
        Protocol::MultiShot,
        Protocol::Brushed,
        Protocol::DShot150,
        Protocol::DShot300,
        Protocol::DShot600,
        Protocol::DShot1200,
        Protocol::Proshot1000,
    ];

    /// The id stored in persistent configuration.
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn spec(self) -> &'static ProtocolSpec {
        &SPECS[self as usize]
    }

    pub fn kind(self) -> ProtocolKind {
        self.spec().kind
    }

    pub fn is_dshot(self) -> bool {
        self.kind() == ProtocolKind::Digital
    }

    pub fn name(self) -> &'static str {
        match self {
            Protocol::Standard => "PWM",
            Protocol::OneShot125 => "ONESHOT125",
            Protocol::OneShot42 => "ONESHOT42",
            Protocol::MultiShot => "MULTISHOT",
            Protocol::Brushed => "BRUSHED",
            Protocol::DShot150 => "DSHOT150",
            Protocol::DShot300 => "DSHOT300",
            Protocol::DShot600 => "DSHOT600",
            Protocol::DShot1200 => "DSHOT1200",
            Protocol::Proshot1000 => "PROSHOT1000",
        }
    }
}

impl TryFrom<u8> for Protocol {
    type Error = ConfigError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Protocol::ALL
            .get(id as usize)
            .copied()
            .ok_or(ConfigError::UnknownProtocolId(id))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
