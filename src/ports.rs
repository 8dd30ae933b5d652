//! Port traits — the boundary between core logic and board peripherals.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ task loops (core logic)
//! ```
//!
//! Driven adapters (RTC, GPIO, display, EEPROM) implement these traits.
//! The task loops consume them via generics, so the core never touches
//! hardware directly and every loop runs unmodified against the mock
//! implementations in the test suite.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Time source port (external battery-backed RTC)
// ───────────────────────────────────────────────────────────────

/// Read/write access to the external real-time clock.
///
/// The soft clock reconciles against `minutes()` once per tick; `set_time`
/// is only ever called from the menu's clock screen.
pub trait TimeSourcePort {
    fn hours(&self) -> u8;
    fn minutes(&self) -> u8;
    fn seconds(&self) -> u8;

    /// False when the oscillator is stopped (dead coin cell, first power-up).
    fn is_running(&self) -> bool;

    fn set_time(&mut self, hour: u8, minute: u8, second: u8);
}

// ───────────────────────────────────────────────────────────────
// GPIO port
// ───────────────────────────────────────────────────────────────

/// Logic level on a pin. The whole board is wired active-LOW: buttons pull
/// to ground when pressed and the relay board engages on a low input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level that engages an active-low load.
    pub fn engaged(on: bool) -> Self {
        if on { Self::Low } else { Self::High }
    }

    /// True for a pressed button / engaged load (active-low).
    pub fn is_engaged(self) -> bool {
        self == Self::Low
    }
}

/// Raw pin access.
pub trait GpioPort {
    fn read_level(&self, pin: i32) -> Level;
    fn write_level(&mut self, pin: i32, level: Level);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Opaque rendering surface for the menu.
///
/// The menu only ever asks for text at a cursor position plus a marker
/// rectangle/line under the field being edited; everything at the glyph
/// level belongs to the adapter.
pub trait DisplayPort {
    fn clear(&mut self);
    fn print_at(&mut self, col: u8, row: u8, text: &str);
    /// Marker rectangle, in character cells.
    fn draw_rect(&mut self, col: u8, row: u8, width: u8, height: u8);
    /// Horizontal rule, in character cells.
    fn draw_hline(&mut self, col: u8, row: u8, len: u8);
}

// ───────────────────────────────────────────────────────────────
// EEPROM port
// ───────────────────────────────────────────────────────────────

/// Byte-addressed persistent storage.
pub trait EepromPort {
    /// Fill `buf` from `addr`.
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Idempotent write: only bytes that differ from the stored image are
    /// rewritten, sparing EEPROM wear on repeated saves.
    fn update(&mut self, addr: usize, data: &[u8]) -> Result<(), StorageError>;
}

/// Errors from [`EepromPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The access runs past the end of the part.
    OutOfBounds,
    /// The I²C transfer failed.
    Bus,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "address out of bounds"),
            Self::Bus => write!(f, "bus transfer failed"),
        }
    }
}
