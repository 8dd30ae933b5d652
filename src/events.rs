//! Classified button events and their single-slot delivery mailbox.
//!
//! ```text
//! ┌────────────────┐  publish   ┌─────────────┐   take    ┌───────────┐
//! │ Input task     │───────────▶│  PRESS_SLOT │──────────▶│ Menu task │
//! │ (50 ms poll)   │ overwrites │ (one event) │  clears   │ (200 ms)  │
//! └────────────────┘            └─────────────┘           └───────────┘
//! ```
//!
//! Exactly one event is live at any instant. Publishing overwrites an
//! unconsumed event; the first consumer clears the slot. There is no queue:
//! a press that lands before the previous one was consumed replaces it, an
//! accepted trade-off at the 50 ms poll / 200 ms consume cadence.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Physical front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Advances / commits the current menu field; long press backs out.
    Select,
    /// Cycles the current menu field's value; held, it fast-forwards.
    Adjust,
}

/// How long the button was held before (or while) the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    Short,
    Long,
    Repeat,
}

/// One classified press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    pub button: Button,
    pub kind: PressKind,
}

impl PressEvent {
    pub const fn new(button: Button, kind: PressKind) -> Self {
        Self { button, kind }
    }
}

/// The latest-press mailbox shared by the input and menu tasks.
static PRESS_SLOT: Signal<CriticalSectionRawMutex, PressEvent> = Signal::new();

/// Publish a classified press, overwriting any unconsumed one.
pub fn publish(event: PressEvent) {
    PRESS_SLOT.signal(event);
}

/// Take the pending press, leaving the slot empty.
pub fn take() -> Option<PressEvent> {
    PRESS_SLOT.try_take()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the slot is a process-wide static, so the overwrite and
    // clear checks must not run concurrently with each other.
    #[test]
    fn slot_overwrites_and_clears() {
        assert_eq!(take(), None);

        publish(PressEvent::new(Button::Select, PressKind::Short));
        publish(PressEvent::new(Button::Adjust, PressKind::Long));

        // Second publish replaced the first — no queueing.
        assert_eq!(
            take(),
            Some(PressEvent::new(Button::Adjust, PressKind::Long))
        );
        // First consumer cleared the slot.
        assert_eq!(take(), None);
    }
}
