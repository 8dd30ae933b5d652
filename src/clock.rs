//! Drift-corrected software time-of-day clock.
//!
//! The scheduler only provides relative sleeps, so wall-clock time is kept
//! by a one-second software tick and reconciled against the external RTC.
//! Reconciliation is deliberately rate-limited: only a ±1-minute
//! discrepancy (the skew tick-granularity rounding can produce) is adopted
//! from the RTC; anything larger is treated as a one-off misread and the
//! locally ticking value stands. The clock is never slaved sample-by-sample
//! to the RTC.

use core::fmt;

use log::info;

use crate::ports::TimeSourcePort;

/// Minutes in a day — the modulus for day-ring arithmetic.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// A wall-clock instant with minute resolution. No date component; day
/// boundaries are handled by hour wraparound only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Construct, normalizing out-of-range components by wraparound.
    /// Values are never rejected.
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
        }
    }

    /// Minutes since midnight.
    pub const fn minutes_of_day(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Minutes from `from` to `self` going forward around the day ring.
    pub const fn minutes_since(self, from: Self) -> u16 {
        (self.minutes_of_day() + MINUTES_PER_DAY - from.minutes_of_day()) % MINUTES_PER_DAY
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// SoftClock
// ---------------------------------------------------------------------------

/// The locally ticking clock. The clock task is its only writer.
pub struct SoftClock {
    now: TimeOfDay,
    second: u8,
}

impl SoftClock {
    /// Seed from the external RTC at boot.
    pub fn from_source(rtc: &impl TimeSourcePort) -> Self {
        let now = TimeOfDay::new(rtc.hours(), rtc.minutes());
        info!("Clock seeded from RTC: {} ({:02}s)", now, rtc.seconds());
        Self {
            now,
            second: rtc.seconds() % 60,
        }
    }

    pub fn now(&self) -> TimeOfDay {
        self.now
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// One-second tick: advance, then reconcile against the RTC minute.
    pub fn tick(&mut self, rtc: &impl TimeSourcePort) {
        self.second += 1;
        if self.second >= 60 {
            self.second = 0;
            self.now.minute += 1;
            if self.now.minute >= 60 {
                self.now.minute = 0;
                self.now.hour = (self.now.hour + 1) % 24;
            }
        }

        // Plain (non-wrapping) comparison: around the hour boundary the
        // minutes read 59 vs 00 and no correction applies — the local tick
        // rolls the hour on its own.
        let rtc_minute = rtc.minutes() % 60;
        if rtc_minute == self.now.minute + 1 || rtc_minute + 1 == self.now.minute {
            self.now.minute = rtc_minute;
        }
        // Larger discrepancies: one-off RTC misread, keep the local value.
    }

    /// User time-set from the menu: write the local value and the RTC
    /// together and restart the seconds counter.
    pub fn set(&mut self, time: TimeOfDay, rtc: &mut impl TimeSourcePort) {
        self.now = time;
        self.second = 0;
        rtc.set_time(time.hour, time.minute, 0);
        info!("Clock set to {}", time);
    }
}
