use crate::Protocol;

/// A configuration that cannot be brought up on this hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("{requested} outputs requested but only {available} are available")]
    TooManyOutputs { requested: usize, available: usize },

    #[error("protocol {0} is not supported by this hardware")]
    UnsupportedProtocol(Protocol),

    #[error("protocol {0} cannot drive bidirectional outputs")]
    Unsupported3d(Protocol),

    #[error("idle pulse {idle} outside of {min}..{max}")]
    IdlePulseOutOfRange { idle: u16, min: u16, max: u16 },

    #[error("output rate is too fast for the protocol pulse width")]
    InvalidRate,

    #[error("3D neutral must lie inside the 3D limits")]
    InvalidNeutral,

    #[error("unknown protocol id {0}")]
    UnknownProtocolId(u8),
}

/// Motor output error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("motor {index} out of range for {count} outputs")]
    IndexOutOfRange { index: usize, count: usize },

    /// The output is not accepting a cycle right now, retry on the next tick.
    #[error("motor output not ready")]
    NotReady,

    #[error("motor output not initialized")]
    NotInitialized,

    #[error("expected {expected} values, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}
