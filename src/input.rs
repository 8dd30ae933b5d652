//! Poll-driven button classifier with short, long, and repeat detection.
//!
//! ## Hardware
//!
//! Two active-low momentary switches with external pull-ups, sampled every
//! 50 ms by the input task. No interrupts: at this poll rate the sample
//! itself is the debounce.
//!
//! ## Classification
//!
//! A hold counter increments once per poll while the button is down.
//!
//! | Condition                      | Event                               |
//! |--------------------------------|-------------------------------------|
//! | Released before tick 8         | `Short` on release                  |
//! | Released at tick 8–19          | `Long` on release                   |
//! | Still held at tick 20          | `Long` immediately, then `Repeat`   |
//! |                                | every 5 ticks until release         |
//! | Released while repeating       | nothing further                     |
//!
//! A stuck-low pin therefore classifies as a perpetual hold and repeat
//! stream, which is the intended behavior for a jammed button.

use crate::events::{Button, PressEvent, PressKind};

/// Input task poll period. The tick thresholds below are in units of this.
pub const POLL_PERIOD_MS: u64 = 50;

/// Hold ticks at which a press stops being short.
const LONG_AT_TICKS: u8 = 8;
/// Hold ticks at which the repeat stream starts.
const REPEAT_AT_TICKS: u8 = 20;
/// Ticks between repeat events once the stream has started.
const REPEAT_EVERY_TICKS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoldMode {
    Idle,
    ShortHeld,
    LongHeld,
    Repeating,
}

/// Per-button classification state. Owned exclusively by the input task.
pub struct ButtonClassifier {
    button: Button,
    mode: HoldMode,
    held_ticks: u8,
}

impl ButtonClassifier {
    pub fn new(button: Button) -> Self {
        Self {
            button,
            mode: HoldMode::Idle,
            held_ticks: 0,
        }
    }

    /// Feed one poll sample. `pressed` is the active-low read of the pin.
    /// Returns the classified event fired by this sample, if any.
    pub fn poll(&mut self, pressed: bool) -> Option<PressEvent> {
        if pressed {
            self.poll_held()
        } else {
            self.poll_released()
        }
    }

    /// True once the hold has crossed the long threshold — drives the
    /// hold-feedback LED.
    pub fn held_past_short(&self) -> bool {
        matches!(self.mode, HoldMode::LongHeld | HoldMode::Repeating)
    }

    fn poll_held(&mut self) -> Option<PressEvent> {
        self.held_ticks = self.held_ticks.saturating_add(1);
        match self.mode {
            HoldMode::Idle => {
                self.mode = HoldMode::ShortHeld;
                self.held_ticks = 1;
                None
            }
            HoldMode::ShortHeld => {
                if self.held_ticks >= LONG_AT_TICKS {
                    self.mode = HoldMode::LongHeld;
                }
                None
            }
            HoldMode::LongHeld => {
                if self.held_ticks >= REPEAT_AT_TICKS {
                    self.mode = HoldMode::Repeating;
                    self.held_ticks = 0;
                    return Some(PressEvent::new(self.button, PressKind::Long));
                }
                None
            }
            HoldMode::Repeating => {
                if self.held_ticks >= REPEAT_EVERY_TICKS {
                    self.held_ticks = 0;
                    return Some(PressEvent::new(self.button, PressKind::Repeat));
                }
                None
            }
        }
    }

    fn poll_released(&mut self) -> Option<PressEvent> {
        let event = match self.mode {
            HoldMode::Idle | HoldMode::Repeating => None,
            HoldMode::ShortHeld => Some(PressEvent::new(self.button, PressKind::Short)),
            HoldMode::LongHeld => Some(PressEvent::new(self.button, PressKind::Long)),
        };
        self.mode = HoldMode::Idle;
        self.held_ticks = 0;
        event
    }
}
