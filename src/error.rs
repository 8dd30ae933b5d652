//! Unified error types for the vivarium controller firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level error handling uniform. All variants are `Copy` so they can be
//! passed through task loops without allocation.

use core::fmt;

use crate::ports::StorageError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The external time source is absent or its oscillator is stopped.
    /// Fatal at boot — there is no recovery path without a running clock.
    TimeSource(&'static str),
    /// EEPROM transfer failed.
    Storage(StorageError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeSource(msg) => write!(f, "time source: {msg}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
