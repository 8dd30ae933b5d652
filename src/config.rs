//! Peripheral schedule configuration.
//!
//! One aggregate [`Configuration`] holds every device's schedule. The menu
//! task is its only writer; the activation tasks are read-only borrowers.
//! Cold-start defaults pre-seed lamp 1 and the pump with sane windows; a
//! successful boot-time EEPROM load overwrites them; an explicit menu save
//! commits them back (`crate::storage`).

use heapless::Vec;

use crate::clock::TimeOfDay;

/// Number of independently scheduled grow lamps.
pub const LAMP_COUNT: usize = 3;
/// Trigger slots per multi-event device.
pub const MAX_TRIGGERS: usize = 10;
/// Upper bound on the pump run duration, in seconds.
pub const MAX_RUN_SECS: u8 = 200;
/// Upper bound on a multi-event run duration, in minutes.
pub const MAX_RUN_MINUTES: u8 = 200;

// ---------------------------------------------------------------------------
// Per-device schedules
// ---------------------------------------------------------------------------

/// Daily on/off window for one grow lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampSchedule {
    pub on_at: TimeOfDay,
    pub off_at: TimeOfDay,
    pub enabled: bool,
}

impl LampSchedule {
    pub const fn disabled() -> Self {
        Self {
            on_at: TimeOfDay::new(0, 0),
            off_at: TimeOfDay::new(0, 0),
            enabled: false,
        }
    }
}

/// Irrigation valve: one timed burst at the window's start minute of each
/// hour inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PumpSchedule {
    /// Burst length in seconds (0–[`MAX_RUN_SECS`]).
    pub run_secs: u8,
    pub window_start: TimeOfDay,
    pub window_end: TimeOfDay,
    pub enabled: bool,
}

/// Mist head / air bubbler: up to [`MAX_TRIGGERS`] daily start times, each
/// holding the output for `run_minutes`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventSchedule {
    /// Hold time in minutes (0–[`MAX_RUN_MINUTES`]).
    pub run_minutes: u8,
    pub triggers: Vec<TimeOfDay, MAX_TRIGGERS>,
    pub enabled: bool,
}

impl EventSchedule {
    /// Number of configured triggers.
    pub fn count(&self) -> usize {
        self.triggers.len()
    }

    /// Append a trigger. Fails (returning the value back) when all
    /// [`MAX_TRIGGERS`] slots are taken — capacity is a hard bound, not a
    /// crash.
    pub fn add_trigger(&mut self, at: TimeOfDay) -> Result<(), TimeOfDay> {
        self.triggers.push(at)
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Every device's schedule, as edited by the menu and read by the
/// activation tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub lamps: [LampSchedule; LAMP_COUNT],
    pub pump: PumpSchedule,
    pub mist: EventSchedule,
    pub bubble: EventSchedule,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            lamps: [
                // Lamp 1 pre-seeded with a daylight window.
                LampSchedule {
                    on_at: TimeOfDay::new(8, 0),
                    off_at: TimeOfDay::new(20, 0),
                    enabled: true,
                },
                LampSchedule::disabled(),
                LampSchedule::disabled(),
            ],
            pump: PumpSchedule {
                run_secs: 30,
                window_start: TimeOfDay::new(8, 0),
                window_end: TimeOfDay::new(21, 0),
                enabled: true,
            },
            mist: EventSchedule::default(),
            bubble: EventSchedule::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = Configuration::default();
        assert!(c.lamps[0].enabled);
        assert!(!c.lamps[1].enabled && !c.lamps[2].enabled);
        assert!(c.pump.enabled);
        assert!(c.pump.run_secs <= MAX_RUN_SECS);
        assert!(c.pump.window_start.minutes_of_day() < c.pump.window_end.minutes_of_day());
        assert_eq!(c.mist.count(), 0);
        assert_eq!(c.bubble.count(), 0);
    }

    #[test]
    fn trigger_capacity_is_a_hard_bound() {
        let mut s = EventSchedule::default();
        for minute in 0..MAX_TRIGGERS as u8 {
            assert!(s.add_trigger(TimeOfDay::new(10, minute)).is_ok());
        }
        assert_eq!(s.count(), MAX_TRIGGERS);

        // The 11th is rejected and the count stays put.
        assert!(s.add_trigger(TimeOfDay::new(11, 0)).is_err());
        assert_eq!(s.count(), MAX_TRIGGERS);
    }
}
