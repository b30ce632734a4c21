//! Logging macros.
//!
//! With the `defmt` feature these are the `defmt` macros, otherwise they
//! expand to nothing.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, info, warn};

#[cfg(not(feature = "defmt"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {{}};
}

// Renamed on export, a local `warn` would clash with the builtin attribute
#[cfg(not(feature = "defmt"))]
pub(crate) use {log_debug as debug, log_info as info, log_warn as warn};
