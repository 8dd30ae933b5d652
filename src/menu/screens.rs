//! Named transition handlers and rendering for each menu screen.
//!
//! Every handler takes the current step by value and returns the next
//! state. Drafts ride inside the step variants; nothing touches
//! [`Configuration`] until the final step of a wizard commits, so a long
//! Select abandons an edit without a trace.

use core::fmt::Write as _;

use heapless::String;
use log::info;

use crate::clock::TimeOfDay;
use crate::config::{Configuration, MAX_RUN_MINUTES, MAX_RUN_SECS, LAMP_COUNT, MAX_TRIGGERS};
use crate::events::{Button, PressEvent, PressKind};
use crate::ports::DisplayPort;

use super::{
    EditOutcome, EventDevice, EventDraft, EventSlot, EventStep, LampStep, MenuEffect, MenuEntry,
    MenuState, PumpStep, TimeEditor,
};

/// Adjust step for duration fields while fast-forwarding.
const DURATION_FAST_STEP: u8 = 10;

/// Cycle a numeric field: wraps past `max_inclusive` back to 0.
fn cycle(value: u8, max_inclusive: u8, step: u8) -> u8 {
    ((u16::from(value) + u16::from(step)) % (u16::from(max_inclusive) + 1)) as u8
}

fn duration_step(kind: PressKind) -> u8 {
    match kind {
        PressKind::Short => 1,
        PressKind::Long | PressKind::Repeat => DURATION_FAST_STEP,
    }
}

// ---------------------------------------------------------------------------
// Setup (top-level list)
// ---------------------------------------------------------------------------

pub(super) fn setup(
    entry: MenuEntry,
    press: PressEvent,
    config: &Configuration,
    now: TimeOfDay,
) -> (MenuState, Option<MenuEffect>) {
    match (press.button, press.kind) {
        (Button::Adjust, _) => (MenuState::Setup { entry: entry.next() }, None),
        (Button::Select, PressKind::Short) => enter(entry, config, now),
        (Button::Select, PressKind::Long) => {
            info!("Menu: off");
            (MenuState::Off, None)
        }
        (Button::Select, PressKind::Repeat) => (MenuState::Setup { entry }, None),
    }
}

fn enter(
    entry: MenuEntry,
    config: &Configuration,
    now: TimeOfDay,
) -> (MenuState, Option<MenuEffect>) {
    info!("Menu: entering {}", entry.label());
    let state = match entry {
        MenuEntry::Lamps => MenuState::Lamp(LampStep::Pick { index: 0 }),
        MenuEntry::Pump => MenuState::Pump(PumpStep::Enabled { draft: config.pump }),
        MenuEntry::Mist => MenuState::Event {
            device: EventDevice::Mist,
            step: EventStep::Mode { add: true },
        },
        MenuEntry::Bubbles => MenuState::Event {
            device: EventDevice::Bubbles,
            step: EventStep::Mode { add: true },
        },
        MenuEntry::Clock => MenuState::Clock { editor: TimeEditor::new(now) },
        MenuEntry::Save => return (MenuState::Setup { entry }, Some(MenuEffect::Save)),
        MenuEntry::Exit => MenuState::Off,
    };
    (state, None)
}

// ---------------------------------------------------------------------------
// Lamp wizard: pick -> enabled -> on time -> off time
// ---------------------------------------------------------------------------

pub(super) fn lamp(step: LampStep, press: PressEvent, config: &mut Configuration) -> MenuState {
    match step {
        LampStep::Pick { index } => match (press.button, press.kind) {
            (Button::Adjust, _) => MenuState::Lamp(LampStep::Pick {
                index: (index + 1) % LAMP_COUNT,
            }),
            (Button::Select, PressKind::Short) => MenuState::Lamp(LampStep::Enabled {
                index,
                draft: config.lamps[index],
            }),
            (Button::Select, PressKind::Long) => MenuState::Setup { entry: MenuEntry::Lamps },
            (Button::Select, PressKind::Repeat) => MenuState::Lamp(step),
        },

        LampStep::Enabled { index, mut draft } => match (press.button, press.kind) {
            (Button::Adjust, _) => {
                draft.enabled = !draft.enabled;
                MenuState::Lamp(LampStep::Enabled { index, draft })
            }
            (Button::Select, PressKind::Short) => MenuState::Lamp(LampStep::OnTime {
                index,
                draft,
                editor: TimeEditor::new(draft.on_at),
            }),
            (Button::Select, PressKind::Long) => MenuState::Lamp(LampStep::Pick { index }),
            (Button::Select, PressKind::Repeat) => {
                MenuState::Lamp(LampStep::Enabled { index, draft })
            }
        },

        LampStep::OnTime { index, mut draft, mut editor } => match editor.handle(press) {
            EditOutcome::Editing => MenuState::Lamp(LampStep::OnTime { index, draft, editor }),
            EditOutcome::Committed(time) => {
                draft.on_at = time;
                MenuState::Lamp(LampStep::OffTime {
                    index,
                    draft,
                    editor: TimeEditor::new(draft.off_at),
                })
            }
            EditOutcome::Backed => MenuState::Lamp(LampStep::Enabled { index, draft }),
        },

        LampStep::OffTime { index, mut draft, mut editor } => match editor.handle(press) {
            EditOutcome::Editing => MenuState::Lamp(LampStep::OffTime { index, draft, editor }),
            EditOutcome::Committed(time) => {
                draft.off_at = time;
                config.lamps[index] = draft;
                info!(
                    "Lamp {}: {} {}-{}",
                    index + 1,
                    if draft.enabled { "enabled" } else { "disabled" },
                    draft.on_at,
                    draft.off_at
                );
                MenuState::Setup { entry: MenuEntry::Lamps }
            }
            EditOutcome::Backed => MenuState::Lamp(LampStep::OnTime {
                index,
                draft,
                editor: TimeEditor::new(draft.on_at),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Pump wizard: enabled -> run seconds -> window start -> window end
// ---------------------------------------------------------------------------

pub(super) fn pump(step: PumpStep, press: PressEvent, config: &mut Configuration) -> MenuState {
    match step {
        PumpStep::Enabled { mut draft } => match (press.button, press.kind) {
            (Button::Adjust, _) => {
                draft.enabled = !draft.enabled;
                MenuState::Pump(PumpStep::Enabled { draft })
            }
            (Button::Select, PressKind::Short) => MenuState::Pump(PumpStep::RunSecs { draft }),
            (Button::Select, PressKind::Long) => MenuState::Setup { entry: MenuEntry::Pump },
            (Button::Select, PressKind::Repeat) => MenuState::Pump(PumpStep::Enabled { draft }),
        },

        PumpStep::RunSecs { mut draft } => match (press.button, press.kind) {
            (Button::Adjust, kind) => {
                draft.run_secs = cycle(draft.run_secs, MAX_RUN_SECS, duration_step(kind));
                MenuState::Pump(PumpStep::RunSecs { draft })
            }
            (Button::Select, PressKind::Short) => MenuState::Pump(PumpStep::WindowStart {
                draft,
                editor: TimeEditor::new(draft.window_start),
            }),
            (Button::Select, PressKind::Long) => MenuState::Pump(PumpStep::Enabled { draft }),
            (Button::Select, PressKind::Repeat) => MenuState::Pump(PumpStep::RunSecs { draft }),
        },

        PumpStep::WindowStart { mut draft, mut editor } => match editor.handle(press) {
            EditOutcome::Editing => MenuState::Pump(PumpStep::WindowStart { draft, editor }),
            EditOutcome::Committed(time) => {
                draft.window_start = time;
                MenuState::Pump(PumpStep::WindowEnd {
                    draft,
                    editor: TimeEditor::new(draft.window_end),
                })
            }
            EditOutcome::Backed => MenuState::Pump(PumpStep::RunSecs { draft }),
        },

        PumpStep::WindowEnd { mut draft, mut editor } => match editor.handle(press) {
            EditOutcome::Editing => MenuState::Pump(PumpStep::WindowEnd { draft, editor }),
            EditOutcome::Committed(time) => {
                draft.window_end = time;
                config.pump = draft;
                info!(
                    "Pump: {} {}s {}-{}",
                    if draft.enabled { "enabled" } else { "disabled" },
                    draft.run_secs,
                    draft.window_start,
                    draft.window_end
                );
                MenuState::Setup { entry: MenuEntry::Pump }
            }
            EditOutcome::Backed => MenuState::Pump(PumpStep::WindowStart {
                draft,
                editor: TimeEditor::new(draft.window_start),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Multi-event wizard: mode -> slot -> run minutes -> enabled -> trigger
// ---------------------------------------------------------------------------

pub(super) fn event(
    device: EventDevice,
    step: EventStep,
    press: PressEvent,
    config: &mut Configuration,
) -> MenuState {
    let stay = |step| MenuState::Event { device, step };

    match step {
        EventStep::Mode { add } => match (press.button, press.kind) {
            (Button::Adjust, _) => stay(EventStep::Mode { add: !add }),
            (Button::Select, PressKind::Short) => {
                let schedule = device.schedule(config);
                let draft = EventDraft {
                    run_minutes: schedule.run_minutes,
                    enabled: schedule.enabled,
                };
                if add {
                    if schedule.count() >= MAX_TRIGGERS {
                        info!("Menu: {} trigger slots full", device.label());
                        stay(EventStep::Full)
                    } else {
                        stay(EventStep::RunMinutes { slot: EventSlot::Append, draft })
                    }
                } else if schedule.count() == 0 {
                    // Nothing to edit yet.
                    stay(EventStep::Mode { add })
                } else {
                    stay(EventStep::Pick { index: 0 })
                }
            }
            (Button::Select, PressKind::Long) => MenuState::Setup { entry: device.entry() },
            (Button::Select, PressKind::Repeat) => stay(EventStep::Mode { add }),
        },

        EventStep::Pick { index } => match (press.button, press.kind) {
            (Button::Adjust, _) => {
                let count = device.schedule(config).count().max(1);
                stay(EventStep::Pick { index: (index + 1) % count })
            }
            (Button::Select, PressKind::Short) => {
                let schedule = device.schedule(config);
                let draft = EventDraft {
                    run_minutes: schedule.run_minutes,
                    enabled: schedule.enabled,
                };
                stay(EventStep::RunMinutes { slot: EventSlot::Existing(index), draft })
            }
            (Button::Select, PressKind::Long) => stay(EventStep::Mode { add: false }),
            (Button::Select, PressKind::Repeat) => stay(EventStep::Pick { index }),
        },

        EventStep::RunMinutes { slot, mut draft } => match (press.button, press.kind) {
            (Button::Adjust, kind) => {
                draft.run_minutes = cycle(draft.run_minutes, MAX_RUN_MINUTES, duration_step(kind));
                stay(EventStep::RunMinutes { slot, draft })
            }
            (Button::Select, PressKind::Short) => stay(EventStep::Enabled { slot, draft }),
            (Button::Select, PressKind::Long) => match slot {
                EventSlot::Existing(index) => stay(EventStep::Pick { index }),
                EventSlot::Append => stay(EventStep::Mode { add: true }),
            },
            (Button::Select, PressKind::Repeat) => stay(EventStep::RunMinutes { slot, draft }),
        },

        EventStep::Enabled { slot, mut draft } => match (press.button, press.kind) {
            (Button::Adjust, _) => {
                draft.enabled = !draft.enabled;
                stay(EventStep::Enabled { slot, draft })
            }
            (Button::Select, PressKind::Short) => {
                let initial = match slot {
                    EventSlot::Existing(index) => device.schedule(config).triggers[index],
                    EventSlot::Append => TimeOfDay::new(0, 0),
                };
                stay(EventStep::TriggerTime { slot, draft, editor: TimeEditor::new(initial) })
            }
            (Button::Select, PressKind::Long) => stay(EventStep::RunMinutes { slot, draft }),
            (Button::Select, PressKind::Repeat) => stay(EventStep::Enabled { slot, draft }),
        },

        EventStep::TriggerTime { slot, draft, mut editor } => match editor.handle(press) {
            EditOutcome::Editing => stay(EventStep::TriggerTime { slot, draft, editor }),
            EditOutcome::Committed(time) => {
                let schedule = device.schedule_mut(config);
                schedule.run_minutes = draft.run_minutes;
                schedule.enabled = draft.enabled;
                let slot_number = match slot {
                    EventSlot::Existing(index) => {
                        schedule.triggers[index] = time;
                        index + 1
                    }
                    EventSlot::Append => {
                        // Capacity was checked on entry; the menu is the
                        // sole writer, so the slot is still free.
                        if schedule.add_trigger(time).is_err() {
                            return stay(EventStep::Full);
                        }
                        schedule.count()
                    }
                };
                info!(
                    "{}: {} {}min, trigger {} -> {}",
                    device.label(),
                    if draft.enabled { "enabled" } else { "disabled" },
                    draft.run_minutes,
                    slot_number,
                    time
                );
                MenuState::Setup { entry: device.entry() }
            }
            EditOutcome::Backed => stay(EventStep::Enabled { slot, draft }),
        },

        // Terminal until acknowledged: any press returns to setup.
        EventStep::Full => MenuState::Setup { entry: device.entry() },
    }
}

// ---------------------------------------------------------------------------
// Clock screen
// ---------------------------------------------------------------------------

pub(super) fn clock(mut editor: TimeEditor, press: PressEvent) -> (MenuState, Option<MenuEffect>) {
    match editor.handle(press) {
        EditOutcome::Editing => (MenuState::Clock { editor }, None),
        EditOutcome::Committed(time) => (
            MenuState::Setup { entry: MenuEntry::Clock },
            Some(MenuEffect::SetTime(time)),
        ),
        EditOutcome::Backed => (MenuState::Setup { entry: MenuEntry::Clock }, None),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub(super) fn render(
    state: MenuState,
    config: &Configuration,
    now: TimeOfDay,
    display: &mut impl DisplayPort,
) {
    display.clear();
    match state {
        MenuState::Off => {}

        MenuState::Setup { entry } => {
            display.print_at(0, 0, "SETUP");
            let mut line: String<16> = String::new();
            let _ = write!(line, "> {}", entry.label());
            display.print_at(0, 1, &line);
        }

        MenuState::Lamp(step) => render_lamp(step, config, display),
        MenuState::Pump(step) => render_pump(step, display),
        MenuState::Event { device, step } => render_event(device, step, config, display),

        MenuState::Clock { editor } => {
            let mut title: String<16> = String::new();
            let _ = write!(title, "CLOCK {}", now);
            display.print_at(0, 0, &title);
            editor.render(display, 1, "SET");
        }
    }
}

fn render_enabled(display: &mut impl DisplayPort, enabled: bool) {
    display.print_at(0, 1, if enabled { "ENABLED: YES" } else { "ENABLED: NO" });
}

fn render_duration(display: &mut impl DisplayPort, value: u8, unit: char) {
    let mut line: String<16> = String::new();
    let _ = write!(line, "RUN {:>3}{}", value, unit);
    display.print_at(0, 1, &line);
}

fn render_lamp(step: LampStep, config: &Configuration, display: &mut impl DisplayPort) {
    match step {
        LampStep::Pick { index } => {
            display.print_at(0, 0, "LAMPS");
            let mut line: String<16> = String::new();
            let _ = write!(
                line,
                "LAMP {}  {}",
                index + 1,
                if config.lamps[index].enabled { "ON" } else { "OFF" }
            );
            display.print_at(0, 1, &line);
        }
        LampStep::Enabled { index, draft } => {
            render_lamp_title(display, index);
            render_enabled(display, draft.enabled);
        }
        LampStep::OnTime { index, editor, .. } => {
            render_lamp_title(display, index);
            editor.render(display, 1, "ON");
        }
        LampStep::OffTime { index, editor, .. } => {
            render_lamp_title(display, index);
            editor.render(display, 1, "OFF");
        }
    }
}

fn render_lamp_title(display: &mut impl DisplayPort, index: usize) {
    let mut title: String<16> = String::new();
    let _ = write!(title, "LAMP {}", index + 1);
    display.print_at(0, 0, &title);
}

fn render_pump(step: PumpStep, display: &mut impl DisplayPort) {
    display.print_at(0, 0, "PUMP");
    match step {
        PumpStep::Enabled { draft } => render_enabled(display, draft.enabled),
        PumpStep::RunSecs { draft } => render_duration(display, draft.run_secs, 's'),
        PumpStep::WindowStart { editor, .. } => editor.render(display, 1, "FROM"),
        PumpStep::WindowEnd { editor, .. } => editor.render(display, 1, "TO"),
    }
}

fn render_event(
    device: EventDevice,
    step: EventStep,
    config: &Configuration,
    display: &mut impl DisplayPort,
) {
    display.print_at(0, 0, device.label());
    match step {
        EventStep::Mode { add } => {
            display.print_at(0, 1, if add { "> ADD" } else { "> EDIT" });
        }
        EventStep::Pick { index } => {
            let schedule = device.schedule(config);
            let mut line: String<16> = String::new();
            let _ = write!(
                line,
                "{}/{} AT {}",
                index + 1,
                schedule.count(),
                schedule.triggers[index]
            );
            display.print_at(0, 1, &line);
        }
        EventStep::RunMinutes { draft, .. } => render_duration(display, draft.run_minutes, 'm'),
        EventStep::Enabled { draft, .. } => render_enabled(display, draft.enabled),
        EventStep::TriggerTime { editor, .. } => editor.render(display, 1, "AT"),
        EventStep::Full => {
            display.print_at(0, 1, "SLOTS FULL");
            display.draw_hline(0, 1, 16);
        }
    }
}
