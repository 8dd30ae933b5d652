//! Shared hour/minute editing sub-flow.
//!
//! Every menu that edits a time value (lamp windows, pump window, event
//! triggers, the clock itself) runs this editor: hour component first, then
//! minute. Select commits the focused component and moves on; a long
//! Select demotes minute focus back to hour before backing out of the
//! editor entirely.

use crate::clock::TimeOfDay;
use crate::events::{Button, PressEvent, PressKind};
use crate::ports::DisplayPort;

/// Adjust step for the minute component while fast-forwarding.
const MINUTE_FAST_STEP: u8 = 5;

/// What one press did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Still editing.
    Editing,
    /// Both components committed; the edited value is final.
    Committed(TimeOfDay),
    /// Backed out of the editor from the hour component.
    Backed,
}

/// In-progress edit of one time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEditor {
    time: TimeOfDay,
    minute_focus: bool,
}

impl TimeEditor {
    /// Start editing at `initial`, hour component focused.
    pub fn new(initial: TimeOfDay) -> Self {
        Self {
            time: initial,
            minute_focus: false,
        }
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn minute_focus(&self) -> bool {
        self.minute_focus
    }

    /// Feed one press.
    pub fn handle(&mut self, press: PressEvent) -> EditOutcome {
        match (press.button, press.kind) {
            (Button::Adjust, PressKind::Short) => {
                self.step(1);
                EditOutcome::Editing
            }
            // A held Adjust emits Long once, then the repeat stream — both
            // are fast-forward steps.
            (Button::Adjust, PressKind::Long | PressKind::Repeat) => {
                self.step(if self.minute_focus { MINUTE_FAST_STEP } else { 1 });
                EditOutcome::Editing
            }
            (Button::Select, PressKind::Short) => {
                if self.minute_focus {
                    EditOutcome::Committed(self.time)
                } else {
                    self.minute_focus = true;
                    EditOutcome::Editing
                }
            }
            (Button::Select, PressKind::Long) => {
                if self.minute_focus {
                    self.minute_focus = false;
                    EditOutcome::Editing
                } else {
                    EditOutcome::Backed
                }
            }
            // One abort per long press; the repeat stream does not cascade.
            (Button::Select, PressKind::Repeat) => EditOutcome::Editing,
        }
    }

    fn step(&mut self, by: u8) {
        if self.minute_focus {
            self.time.minute = (self.time.minute + by) % 60;
        } else {
            self.time.hour = (self.time.hour + by) % 24;
        }
    }

    /// Render `label HH:MM` at `row` with a marker under the focused
    /// component. The value is always zero-padded.
    pub fn render(&self, display: &mut impl DisplayPort, row: u8, label: &str) {
        use core::fmt::Write;

        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(line, "{:<4}{}", label, self.time);
        display.print_at(0, row, &line);

        let value_col = 4;
        let focus_col = if self.minute_focus { value_col + 3 } else { value_col };
        display.draw_rect(focus_col, row, 2, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(button: Button, kind: PressKind) -> PressEvent {
        PressEvent::new(button, kind)
    }

    #[test]
    fn adjust_cycles_hour_then_minute() {
        let mut ed = TimeEditor::new(TimeOfDay::new(23, 58));
        ed.handle(press(Button::Adjust, PressKind::Short));
        assert_eq!(ed.time(), TimeOfDay::new(0, 58)); // hour wraps 23 -> 0

        ed.handle(press(Button::Select, PressKind::Short)); // to minute
        ed.handle(press(Button::Adjust, PressKind::Short));
        assert_eq!(ed.time(), TimeOfDay::new(0, 59));
        ed.handle(press(Button::Adjust, PressKind::Short));
        assert_eq!(ed.time(), TimeOfDay::new(0, 0)); // minute wraps 59 -> 0
    }

    #[test]
    fn repeat_fast_forwards_minutes() {
        let mut ed = TimeEditor::new(TimeOfDay::new(10, 0));
        ed.handle(press(Button::Select, PressKind::Short)); // focus minute
        ed.handle(press(Button::Adjust, PressKind::Repeat));
        assert_eq!(ed.time(), TimeOfDay::new(10, MINUTE_FAST_STEP));
    }

    #[test]
    fn commit_takes_two_selects() {
        let mut ed = TimeEditor::new(TimeOfDay::new(7, 15));
        assert_eq!(ed.handle(press(Button::Select, PressKind::Short)), EditOutcome::Editing);
        assert_eq!(
            ed.handle(press(Button::Select, PressKind::Short)),
            EditOutcome::Committed(TimeOfDay::new(7, 15))
        );
    }

    #[test]
    fn long_select_demotes_then_backs_out() {
        let mut ed = TimeEditor::new(TimeOfDay::new(7, 15));
        ed.handle(press(Button::Select, PressKind::Short)); // minute focus
        assert!(ed.minute_focus());

        assert_eq!(ed.handle(press(Button::Select, PressKind::Long)), EditOutcome::Editing);
        assert!(!ed.minute_focus()); // demoted, not exited

        assert_eq!(ed.handle(press(Button::Select, PressKind::Long)), EditOutcome::Backed);
    }
}
