//! Fixed-layout configuration image for the external EEPROM.
//!
//! ```text
//! addr 0                : format marker (one byte)
//! addr 1  .. 1  + 3×5   : lamp records     { on_h, on_m, off_h, off_m, en }
//! addr 16 .. 16 + 6     : pump record      { run_s, start_h, start_m,
//!                                            end_h, end_m, en }
//! addr 22 .. 22 + 2×23  : event records    { count, run_min, en,
//!                                            10 × { h, m } }
//! ```
//!
//! Field order and widths are frozen; the marker byte gates whether a
//! stored image exists at all. Decoding sanitizes each record
//! independently: a corrupt field disables that record but never rejects
//! the rest of the image, so one bad section cannot take out unrelated
//! devices.

use log::{info, warn};

use crate::clock::TimeOfDay;
use crate::config::{
    Configuration, EventSchedule, LampSchedule, PumpSchedule, LAMP_COUNT, MAX_RUN_MINUTES,
    MAX_RUN_SECS, MAX_TRIGGERS,
};
use crate::ports::{EepromPort, StorageError};

/// Identifies a valid configuration image. Bump on any layout change — an
/// old image then reads as absent and the seeded defaults take over.
pub const FORMAT_MARKER: u8 = 0xC3;

const LAMP_REC_LEN: usize = 5;
const PUMP_REC_LEN: usize = 6;
const EVENT_REC_LEN: usize = 3 + 2 * MAX_TRIGGERS;

const ADDR_MARKER: usize = 0;
const ADDR_LAMPS: usize = 1;
const ADDR_PUMP: usize = ADDR_LAMPS + LAMP_COUNT * LAMP_REC_LEN;
const ADDR_EVENTS: usize = ADDR_PUMP + PUMP_REC_LEN;

/// Total image length in bytes.
pub const IMAGE_LEN: usize = ADDR_EVENTS + 2 * EVENT_REC_LEN;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize the full configuration to its EEPROM image.
pub fn encode(config: &Configuration) -> [u8; IMAGE_LEN] {
    let mut image = [0u8; IMAGE_LEN];
    image[ADDR_MARKER] = FORMAT_MARKER;

    for (i, lamp) in config.lamps.iter().enumerate() {
        let at = ADDR_LAMPS + i * LAMP_REC_LEN;
        image[at] = lamp.on_at.hour;
        image[at + 1] = lamp.on_at.minute;
        image[at + 2] = lamp.off_at.hour;
        image[at + 3] = lamp.off_at.minute;
        image[at + 4] = u8::from(lamp.enabled);
    }

    let at = ADDR_PUMP;
    image[at] = config.pump.run_secs;
    image[at + 1] = config.pump.window_start.hour;
    image[at + 2] = config.pump.window_start.minute;
    image[at + 3] = config.pump.window_end.hour;
    image[at + 4] = config.pump.window_end.minute;
    image[at + 5] = u8::from(config.pump.enabled);

    for (i, events) in [&config.mist, &config.bubble].into_iter().enumerate() {
        let at = ADDR_EVENTS + i * EVENT_REC_LEN;
        image[at] = events.count() as u8;
        image[at + 1] = events.run_minutes;
        image[at + 2] = u8::from(events.enabled);
        for (slot, trigger) in events.triggers.iter().enumerate() {
            image[at + 3 + slot * 2] = trigger.hour;
            image[at + 4 + slot * 2] = trigger.minute;
        }
        // Unused trigger slots stay zeroed.
    }

    image
}

// ---------------------------------------------------------------------------
// Decoding + per-record sanitizing
// ---------------------------------------------------------------------------

/// Deserialize an image. `None` when the marker byte does not match.
pub fn decode(image: &[u8; IMAGE_LEN]) -> Option<Configuration> {
    if image[ADDR_MARKER] != FORMAT_MARKER {
        return None;
    }

    let mut config = Configuration::default();

    for (i, lamp) in config.lamps.iter_mut().enumerate() {
        let at = ADDR_LAMPS + i * LAMP_REC_LEN;
        *lamp = LampSchedule {
            on_at: TimeOfDay::new(image[at], image[at + 1]),
            off_at: TimeOfDay::new(image[at + 2], image[at + 3]),
            enabled: sanitize_flag(image[at + 4], "lamp"),
        };
    }

    let at = ADDR_PUMP;
    config.pump = PumpSchedule {
        run_secs: image[at],
        window_start: TimeOfDay::new(image[at + 1], image[at + 2]),
        window_end: TimeOfDay::new(image[at + 3], image[at + 4]),
        enabled: sanitize_flag(image[at + 5], "pump"),
    };
    if config.pump.run_secs > MAX_RUN_SECS {
        warn!(
            "Config image: pump run {}s exceeds {}s, disabling pump",
            config.pump.run_secs, MAX_RUN_SECS
        );
        config.pump.enabled = false;
    }

    config.mist = decode_events(image, 0, "mist");
    config.bubble = decode_events(image, 1, "bubble");

    Some(config)
}

fn decode_events(image: &[u8; IMAGE_LEN], index: usize, name: &str) -> EventSchedule {
    let at = ADDR_EVENTS + index * EVENT_REC_LEN;
    let mut events = EventSchedule {
        run_minutes: image[at + 1],
        enabled: sanitize_flag(image[at + 2], name),
        ..Default::default()
    };

    let mut count = image[at] as usize;
    if count > MAX_TRIGGERS {
        warn!(
            "Config image: {} trigger count {} exceeds {}, disabling device",
            name, count, MAX_TRIGGERS
        );
        count = MAX_TRIGGERS;
        events.enabled = false;
    }
    if events.run_minutes > MAX_RUN_MINUTES {
        warn!(
            "Config image: {} run {}min exceeds {}min, disabling device",
            name, events.run_minutes, MAX_RUN_MINUTES
        );
        events.enabled = false;
    }

    for slot in 0..count {
        let trigger = TimeOfDay::new(image[at + 3 + slot * 2], image[at + 4 + slot * 2]);
        // Capacity was clamped above; the push cannot fail.
        let _ = events.add_trigger(trigger);
    }
    events
}

/// A stored boolean must be exactly 0 or 1; anything else disables the
/// record while leaving its other fields intact.
fn sanitize_flag(byte: u8, name: &str) -> bool {
    match byte {
        0 => false,
        1 => true,
        other => {
            warn!("Config image: {} enable byte {} invalid, disabling", name, other);
            false
        }
    }
}

// ---------------------------------------------------------------------------
// EEPROM round trip
// ---------------------------------------------------------------------------

/// What the boot-time load produced.
pub enum LoadOutcome {
    /// A valid image was found and decoded.
    Stored(Configuration),
    /// No valid image — seeded defaults; the menu should open straight
    /// into setup to force configuration.
    Seeded(Configuration),
}

/// Commit the configuration. Runs only on the explicit menu save action.
pub fn save(config: &Configuration, eeprom: &mut impl EepromPort) -> Result<(), StorageError> {
    let image = encode(config);
    eeprom.update(0, &image)?;
    info!("Configuration saved ({} bytes)", IMAGE_LEN);
    Ok(())
}

/// Boot-time load.
pub fn load(eeprom: &impl EepromPort) -> Result<LoadOutcome, StorageError> {
    let mut image = [0u8; IMAGE_LEN];
    eeprom.read(0, &mut image)?;
    match decode(&image) {
        Some(config) => {
            info!("Configuration loaded from EEPROM");
            Ok(LoadOutcome::Stored(config))
        }
        None => {
            info!("No stored configuration, seeding defaults");
            Ok(LoadOutcome::Seeded(Configuration::default()))
        }
    }
}
