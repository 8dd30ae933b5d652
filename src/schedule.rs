//! Per-peripheral activation-window evaluators.
//!
//! Each device answers "should the output be engaged now?" purely from the
//! current [`TimeOfDay`] and its schedule, recomputed on every evaluation
//! cycle. Only the pump keeps state between cycles: the re-arm gate that
//! limits it to one burst per window minute.
//!
//! ```text
//!  SoftClock ──now──▶ lamp_is_active ─────▶ lamp relays + backlight
//!              ├────▶ PumpGate::fire ─────▶ valve burst (blocking)
//!              └────▶ event_is_active ────▶ mist / bubbler relays
//! ```

use log::info;

use crate::clock::TimeOfDay;
use crate::config::{Configuration, EventSchedule, LampSchedule, PumpSchedule};

// ---------------------------------------------------------------------------
// Lamps
// ---------------------------------------------------------------------------

/// Half-open daily window test under hour-then-minute comparison.
///
/// Windows crossing midnight are not supported for lamps: with
/// `off_at <= on_at` the window is empty and the lamp never switches on.
pub fn lamp_is_active(schedule: &LampSchedule, now: TimeOfDay) -> bool {
    schedule.enabled
        && (schedule.on_at.hour, schedule.on_at.minute) <= (now.hour, now.minute)
        && (now.hour, now.minute) < (schedule.off_at.hour, schedule.off_at.minute)
}

/// Aggregate over all lamps — drives the shared display backlight.
pub fn any_lamp_active(config: &Configuration, now: TimeOfDay) -> bool {
    config.lamps.iter().any(|lamp| lamp_is_active(lamp, now))
}

// ---------------------------------------------------------------------------
// Pump
// ---------------------------------------------------------------------------

/// Re-arm gate for the irrigation burst.
///
/// The pump fires when the hour is inside the window, the minute equals the
/// window's start minute, and the gate is open. Firing closes the gate; it
/// re-opens only once the minute has advanced *strictly* more than
/// `run_secs / 60` minutes past the start minute (day-ring distance, so a
/// start minute of 59 still re-arms after the hour wraps). Within the
/// firing minute the gate therefore stays closed — one burst per window
/// minute, re-armed each hour of the window.
pub struct PumpGate {
    fired: bool,
}

impl PumpGate {
    pub fn new() -> Self {
        Self { fired: false }
    }

    /// Evaluate one cycle. Returns the burst duration in seconds when the
    /// pump should fire now; the caller drives the valve and sleeps.
    pub fn fire(&mut self, schedule: &PumpSchedule, now: TimeOfDay) -> Option<u8> {
        self.rearm(schedule, now);

        if !schedule.enabled || self.fired {
            return None;
        }
        let in_window =
            schedule.window_start.hour <= now.hour && now.hour <= schedule.window_end.hour;
        if in_window && now.minute == schedule.window_start.minute {
            self.fired = true;
            info!("Pump: firing at {} for {}s", now, schedule.run_secs);
            return Some(schedule.run_secs);
        }
        None
    }

    fn rearm(&mut self, schedule: &PumpSchedule, now: TimeOfDay) {
        if !self.fired {
            return;
        }
        // Minute-ring distance from the start minute, so an hour roll
        // counts as forward progress.
        let advanced =
            u16::from((now.minute + 60 - schedule.window_start.minute) % 60);
        if advanced > u16::from(schedule.run_secs) / 60 {
            self.fired = false;
        }
    }
}

// ---------------------------------------------------------------------------
// Multi-event devices (mist, bubbler)
// ---------------------------------------------------------------------------

/// True when `now` falls inside any trigger's hold window.
///
/// Each window is `[trigger, trigger + run_minutes)` on the day ring, so a
/// trigger minute plus duration past the top of the hour — or past
/// midnight — wraps correctly. The pin state is reasserted from scratch
/// every cycle, so overlapping windows need no deduplication.
pub fn event_is_active(schedule: &EventSchedule, now: TimeOfDay) -> bool {
    if !schedule.enabled || schedule.triggers.is_empty() {
        return false;
    }
    schedule
        .triggers
        .iter()
        .any(|trigger| now.minutes_since(*trigger) < u16::from(schedule.run_minutes))
}
