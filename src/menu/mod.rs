//! Two-button configuration menu.
//!
//! A finite state machine keyed by explicit typed states — a top-level
//! identity plus a per-menu step enum carrying the edit draft. Named
//! transition handlers live in [`screens`]; the shared hour/minute editor
//! in [`time_edit`].
//!
//! ```text
//!  OFF ──any press──▶ SETUP ──Select──▶ LAMPS ─▶ pick ─▶ enable ─▶ on ─▶ off ─┐
//!   ▲                  │ ▲ ◀────────────────────────(commit / long abort)─────┘
//!   │                  │ ├──▶ PUMP   enable ─▶ run ─▶ from ─▶ to
//!   │                  │ ├──▶ MIST / BUBBLES   add|edit ─▶ slot ─▶ run ─▶
//!   │                  │ │         enable ─▶ trigger   (full ─▶ ack)
//!   │                  │ ├──▶ CLOCK  set hh:mm
//!   │                  │ ├──▶ SAVE   (commit to EEPROM, stay)
//!   └──────────────────┴─┴──▶ EXIT
//! ```
//!
//! Uniform navigation: Adjust cycles the current field (wrapping at its
//! max back to 0) and fast-forwards numeric fields while held; Select
//! commits the field and advances, with the final step writing the draft
//! back into [`Configuration`]; a long Select backs out one level,
//! discarding the in-progress draft when it leaves the menu.

mod screens;
mod time_edit;

pub use time_edit::{EditOutcome, TimeEditor};

use log::info;

use crate::clock::TimeOfDay;
use crate::config::{Configuration, EventSchedule, LampSchedule, PumpSchedule};
use crate::events::PressEvent;
use crate::ports::DisplayPort;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Top-level menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Lamps,
    Pump,
    Mist,
    Bubbles,
    Clock,
    Save,
    Exit,
}

impl MenuEntry {
    /// Cycle to the next entry, wrapping to the first.
    pub fn next(self) -> Self {
        match self {
            Self::Lamps => Self::Pump,
            Self::Pump => Self::Mist,
            Self::Mist => Self::Bubbles,
            Self::Bubbles => Self::Clock,
            Self::Clock => Self::Save,
            Self::Save => Self::Exit,
            Self::Exit => Self::Lamps,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lamps => "LAMPS",
            Self::Pump => "PUMP",
            Self::Mist => "MIST",
            Self::Bubbles => "BUBBLES",
            Self::Clock => "CLOCK",
            Self::Save => "SAVE",
            Self::Exit => "EXIT",
        }
    }
}

/// Which multi-event device a shared wizard instance is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDevice {
    Mist,
    Bubbles,
}

impl EventDevice {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mist => "MIST",
            Self::Bubbles => "BUBBLES",
        }
    }

    pub fn entry(self) -> MenuEntry {
        match self {
            Self::Mist => MenuEntry::Mist,
            Self::Bubbles => MenuEntry::Bubbles,
        }
    }

    pub fn schedule(self, config: &Configuration) -> &EventSchedule {
        match self {
            Self::Mist => &config.mist,
            Self::Bubbles => &config.bubble,
        }
    }

    pub fn schedule_mut(self, config: &mut Configuration) -> &mut EventSchedule {
        match self {
            Self::Mist => &mut config.mist,
            Self::Bubbles => &mut config.bubble,
        }
    }
}

/// Lamp wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LampStep {
    Pick { index: usize },
    Enabled { index: usize, draft: LampSchedule },
    OnTime { index: usize, draft: LampSchedule, editor: TimeEditor },
    OffTime { index: usize, draft: LampSchedule, editor: TimeEditor },
}

/// Pump wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStep {
    Enabled { draft: PumpSchedule },
    RunSecs { draft: PumpSchedule },
    WindowStart { draft: PumpSchedule, editor: TimeEditor },
    WindowEnd { draft: PumpSchedule, editor: TimeEditor },
}

/// Which trigger slot the multi-event wizard is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSlot {
    Existing(usize),
    Append,
}

/// Device-wide values staged by the multi-event wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDraft {
    pub run_minutes: u8,
    pub enabled: bool,
}

/// Multi-event wizard steps (mist and bubbler share them).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStep {
    Mode { add: bool },
    Pick { index: usize },
    RunMinutes { slot: EventSlot, draft: EventDraft },
    Enabled { slot: EventSlot, draft: EventDraft },
    TriggerTime { slot: EventSlot, draft: EventDraft, editor: TimeEditor },
    /// All trigger slots taken; any press acknowledges and returns to setup.
    Full,
}

/// The complete menu state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Idle, nothing on screen. Any press wakes into setup.
    Off,
    Setup { entry: MenuEntry },
    Lamp(LampStep),
    Pump(PumpStep),
    Event { device: EventDevice, step: EventStep },
    Clock { editor: TimeEditor },
}

/// Side effects the menu requests from its task; the task owns the ports
/// needed to carry them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEffect {
    /// Commit the configuration to the EEPROM.
    Save,
    /// Write this time to the soft clock and the RTC together.
    SetTime(TimeOfDay),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The menu state machine. Sole writer of [`Configuration`].
pub struct Menu {
    state: MenuState,
}

impl Menu {
    /// Normal boot: idle with a blank screen.
    pub fn new() -> Self {
        Self { state: MenuState::Off }
    }

    /// Boot without a stored configuration: open straight into setup so
    /// the user is forced to configure.
    pub fn forced_setup() -> Self {
        Self {
            state: MenuState::Setup { entry: MenuEntry::Lamps },
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_off(&self) -> bool {
        self.state == MenuState::Off
    }

    /// Feed one press. `now` seeds the clock editor when that screen is
    /// entered. Returns a side effect for the caller to execute, if any.
    pub fn handle(
        &mut self,
        press: PressEvent,
        config: &mut Configuration,
        now: TimeOfDay,
    ) -> Option<MenuEffect> {
        let (next, effect) = match self.state {
            MenuState::Off => {
                // Waking press is consumed, not interpreted.
                info!("Menu: waking into setup");
                (MenuState::Setup { entry: MenuEntry::Lamps }, None)
            }
            MenuState::Setup { entry } => screens::setup(entry, press, config, now),
            MenuState::Lamp(step) => (screens::lamp(step, press, config), None),
            MenuState::Pump(step) => (screens::pump(step, press, config), None),
            MenuState::Event { device, step } => {
                (screens::event(device, step, press, config), None)
            }
            MenuState::Clock { editor } => screens::clock(editor, press),
        };
        self.state = next;
        effect
    }

    /// Paint the current screen.
    pub fn render(
        &self,
        config: &Configuration,
        now: TimeOfDay,
        display: &mut impl DisplayPort,
    ) {
        screens::render(self.state, config, now, display);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Button, PressKind};

    fn press(button: Button, kind: PressKind) -> PressEvent {
        PressEvent::new(button, kind)
    }

    fn short(button: Button) -> PressEvent {
        press(button, PressKind::Short)
    }

    #[test]
    fn starts_off_and_any_press_wakes() {
        let mut menu = Menu::new();
        let mut config = Configuration::default();
        assert!(menu.is_off());

        menu.handle(short(Button::Adjust), &mut config, TimeOfDay::new(12, 0));
        assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Lamps });
    }

    #[test]
    fn forced_setup_skips_off() {
        let menu = Menu::forced_setup();
        assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Lamps });
    }

    #[test]
    fn adjust_cycles_all_seven_entries() {
        let mut menu = Menu::forced_setup();
        let mut config = Configuration::default();
        let now = TimeOfDay::new(12, 0);

        let mut seen = vec![MenuEntry::Lamps];
        for _ in 0..6 {
            menu.handle(short(Button::Adjust), &mut config, now);
            match menu.state() {
                MenuState::Setup { entry } => seen.push(entry),
                other => panic!("left setup: {other:?}"),
            }
        }
        assert_eq!(
            seen,
            vec![
                MenuEntry::Lamps,
                MenuEntry::Pump,
                MenuEntry::Mist,
                MenuEntry::Bubbles,
                MenuEntry::Clock,
                MenuEntry::Save,
                MenuEntry::Exit,
            ]
        );

        // Wraps back to the first entry.
        menu.handle(short(Button::Adjust), &mut config, now);
        assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Lamps });
    }

    #[test]
    fn save_entry_emits_effect_and_stays_in_setup() {
        let mut menu = Menu::forced_setup();
        let mut config = Configuration::default();
        let now = TimeOfDay::new(12, 0);

        for _ in 0..5 {
            menu.handle(short(Button::Adjust), &mut config, now); // to SAVE
        }
        let effect = menu.handle(short(Button::Select), &mut config, now);
        assert_eq!(effect, Some(MenuEffect::Save));
        assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Save });
    }

    #[test]
    fn exit_entry_turns_the_menu_off() {
        let mut menu = Menu::forced_setup();
        let mut config = Configuration::default();
        let now = TimeOfDay::new(12, 0);

        for _ in 0..6 {
            menu.handle(short(Button::Adjust), &mut config, now); // to EXIT
        }
        menu.handle(short(Button::Select), &mut config, now);
        assert!(menu.is_off());
    }

    #[test]
    fn long_select_in_setup_turns_off() {
        let mut menu = Menu::forced_setup();
        let mut config = Configuration::default();
        menu.handle(
            press(Button::Select, PressKind::Long),
            &mut config,
            TimeOfDay::new(12, 0),
        );
        assert!(menu.is_off());
    }
}
