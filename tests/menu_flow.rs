//! Integration tests: press sequences through the menu into configuration,
//! persistence, and the press-event mailbox.

use vivarium::clock::TimeOfDay;
use vivarium::config::{Configuration, MAX_TRIGGERS};
use vivarium::events::{self, Button, PressEvent, PressKind};
use vivarium::input::ButtonClassifier;
use vivarium::menu::{EventStep, Menu, MenuEffect, MenuEntry, MenuState};
use vivarium::ports::{DisplayPort, EepromPort, StorageError};
use vivarium::storage::{self, LoadOutcome};

// ── Mock ports ────────────────────────────────────────────────

/// Records every render call so tests can assert on screen content.
struct RecordingDisplay {
    rows: Vec<String>,
    rects: Vec<(u8, u8)>,
}

impl RecordingDisplay {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            rects: Vec::new(),
        }
    }
}

impl DisplayPort for RecordingDisplay {
    fn clear(&mut self) {
        self.rows.clear();
        self.rects.clear();
    }
    fn print_at(&mut self, _col: u8, _row: u8, text: &str) {
        self.rows.push(text.to_string());
    }
    fn draw_rect(&mut self, col: u8, row: u8, _width: u8, _height: u8) {
        self.rects.push((col, row));
    }
    fn draw_hline(&mut self, _col: u8, _row: u8, _len: u8) {}
}

struct MemEeprom {
    cells: std::cell::RefCell<Vec<u8>>,
}

impl MemEeprom {
    fn new() -> Self {
        Self {
            cells: std::cell::RefCell::new(vec![0xFF; 4096]),
        }
    }
}

impl EepromPort for MemEeprom {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let cells = self.cells.borrow();
        if addr + buf.len() > cells.len() {
            return Err(StorageError::OutOfBounds);
        }
        buf.copy_from_slice(&cells[addr..addr + buf.len()]);
        Ok(())
    }
    fn update(&mut self, addr: usize, data: &[u8]) -> Result<(), StorageError> {
        let mut cells = self.cells.borrow_mut();
        if addr + data.len() > cells.len() {
            return Err(StorageError::OutOfBounds);
        }
        cells[addr..addr + data.len()].copy_from_slice(data);
        Ok(())
    }
}

// ── Press helpers ─────────────────────────────────────────────

const NOON: TimeOfDay = TimeOfDay::new(12, 0);

fn select() -> PressEvent {
    PressEvent::new(Button::Select, PressKind::Short)
}

fn select_long() -> PressEvent {
    PressEvent::new(Button::Select, PressKind::Long)
}

fn adjust() -> PressEvent {
    PressEvent::new(Button::Adjust, PressKind::Short)
}

/// Walk setup to `target`, then enter it.
fn open_menu(menu: &mut Menu, config: &mut Configuration, target: MenuEntry) {
    if menu.is_off() {
        menu.handle(adjust(), config, NOON); // wake
    }
    loop {
        match menu.state() {
            MenuState::Setup { entry } if entry == target => break,
            MenuState::Setup { .. } => {
                menu.handle(adjust(), config, NOON);
            }
            other => panic!("expected setup, found {other:?}"),
        }
    }
    menu.handle(select(), config, NOON);
}

/// Drive the shared time editor from `from` to `to` and commit.
fn dial_time(
    menu: &mut Menu,
    config: &mut Configuration,
    from: TimeOfDay,
    to: TimeOfDay,
) -> Option<MenuEffect> {
    for _ in 0..(to.hour + 24 - from.hour) % 24 {
        menu.handle(adjust(), config, NOON);
    }
    menu.handle(select(), config, NOON); // hour -> minute focus
    for _ in 0..(to.minute + 60 - from.minute) % 60 {
        menu.handle(adjust(), config, NOON);
    }
    menu.handle(select(), config, NOON)
}

// ── Lamp wizard ───────────────────────────────────────────────

#[test]
fn lamp_wizard_commits_schedule() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();

    open_menu(&mut menu, &mut config, MenuEntry::Lamps);
    menu.handle(adjust(), &mut config, NOON); // pick lamp 2
    menu.handle(select(), &mut config, NOON); // -> enabled
    menu.handle(adjust(), &mut config, NOON); // disabled -> enabled
    menu.handle(select(), &mut config, NOON); // -> on time (starts 00:00)

    dial_time(&mut menu, &mut config, TimeOfDay::new(0, 0), TimeOfDay::new(7, 30));
    let effect = dial_time(&mut menu, &mut config, TimeOfDay::new(0, 0), TimeOfDay::new(19, 15));

    assert_eq!(effect, None);
    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Lamps });
    assert!(config.lamps[1].enabled);
    assert_eq!(config.lamps[1].on_at, TimeOfDay::new(7, 30));
    assert_eq!(config.lamps[1].off_at, TimeOfDay::new(19, 15));
    // Untouched lamps keep their defaults.
    assert_eq!(config.lamps[0], Configuration::default().lamps[0]);
}

#[test]
fn long_select_abandons_the_draft() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();
    let before = config.clone();

    open_menu(&mut menu, &mut config, MenuEntry::Lamps);
    menu.handle(select(), &mut config, NOON); // lamp 1 -> enabled
    menu.handle(adjust(), &mut config, NOON); // flip the draft
    menu.handle(select(), &mut config, NOON); // -> on time
    menu.handle(adjust(), &mut config, NOON); // bump the hour

    // Unwind: hour edit -> enabled -> pick -> setup.
    menu.handle(select_long(), &mut config, NOON);
    menu.handle(select_long(), &mut config, NOON);
    menu.handle(select_long(), &mut config, NOON);

    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Lamps });
    assert_eq!(config, before);
}

#[test]
fn minute_focus_demotes_before_leaving_the_editor() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();

    open_menu(&mut menu, &mut config, MenuEntry::Lamps);
    menu.handle(select(), &mut config, NOON); // -> enabled
    menu.handle(select(), &mut config, NOON); // -> on time, hour focus
    menu.handle(select(), &mut config, NOON); // -> minute focus

    // First long press only demotes back to the hour component.
    menu.handle(select_long(), &mut config, NOON);
    assert!(matches!(
        menu.state(),
        MenuState::Lamp(vivarium::menu::LampStep::OnTime { .. })
    ));

    // Second long press leaves the editor.
    menu.handle(select_long(), &mut config, NOON);
    assert!(matches!(
        menu.state(),
        MenuState::Lamp(vivarium::menu::LampStep::Enabled { .. })
    ));
}

// ── Pump wizard ───────────────────────────────────────────────

#[test]
fn pump_wizard_commits_with_fast_forward() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();

    open_menu(&mut menu, &mut config, MenuEntry::Pump);
    menu.handle(select(), &mut config, NOON); // keep enabled -> run secs

    // Default 30 s, one repeat (+10) and two shorts (+2) = 42 s.
    menu.handle(PressEvent::new(Button::Adjust, PressKind::Repeat), &mut config, NOON);
    menu.handle(adjust(), &mut config, NOON);
    menu.handle(adjust(), &mut config, NOON);
    menu.handle(select(), &mut config, NOON); // -> window start

    dial_time(&mut menu, &mut config, TimeOfDay::new(8, 0), TimeOfDay::new(9, 30));
    dial_time(&mut menu, &mut config, TimeOfDay::new(21, 0), TimeOfDay::new(18, 0));

    assert_eq!(config.pump.run_secs, 42);
    assert_eq!(config.pump.window_start, TimeOfDay::new(9, 30));
    assert_eq!(config.pump.window_end, TimeOfDay::new(18, 0));
    assert!(config.pump.enabled);
}

// ── Multi-event wizard ────────────────────────────────────────

#[test]
fn mist_add_flow_appends_a_trigger() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();

    open_menu(&mut menu, &mut config, MenuEntry::Mist);
    menu.handle(select(), &mut config, NOON); // mode ADD -> run minutes

    for _ in 0..15 {
        menu.handle(adjust(), &mut config, NOON);
    }
    menu.handle(select(), &mut config, NOON); // -> enabled
    menu.handle(adjust(), &mut config, NOON); // off -> on
    menu.handle(select(), &mut config, NOON); // -> trigger time (00:00)

    dial_time(&mut menu, &mut config, TimeOfDay::new(0, 0), TimeOfDay::new(9, 0));

    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Mist });
    assert_eq!(config.mist.count(), 1);
    assert_eq!(config.mist.triggers[0], TimeOfDay::new(9, 0));
    assert_eq!(config.mist.run_minutes, 15);
    assert!(config.mist.enabled);
    // The bubbler shares the wizard but not the data.
    assert_eq!(config.bubble.count(), 0);
}

#[test]
fn edit_flow_rewrites_an_existing_trigger() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();
    config.bubble.run_minutes = 5;
    config.bubble.enabled = true;
    config.bubble.add_trigger(TimeOfDay::new(6, 0)).unwrap();
    config.bubble.add_trigger(TimeOfDay::new(18, 0)).unwrap();

    open_menu(&mut menu, &mut config, MenuEntry::Bubbles);
    menu.handle(adjust(), &mut config, NOON); // mode ADD -> EDIT
    menu.handle(select(), &mut config, NOON); // -> pick slot 1
    menu.handle(adjust(), &mut config, NOON); // -> slot 2
    menu.handle(select(), &mut config, NOON); // -> run minutes
    menu.handle(select(), &mut config, NOON); // keep -> enabled
    menu.handle(select(), &mut config, NOON); // keep -> trigger time (18:00)

    dial_time(&mut menu, &mut config, TimeOfDay::new(18, 0), TimeOfDay::new(20, 30));

    assert_eq!(config.bubble.count(), 2);
    assert_eq!(config.bubble.triggers[0], TimeOfDay::new(6, 0));
    assert_eq!(config.bubble.triggers[1], TimeOfDay::new(20, 30));
}

#[test]
fn eleventh_trigger_hits_the_full_stop() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();
    for i in 0..MAX_TRIGGERS as u8 {
        config.mist.add_trigger(TimeOfDay::new(i, 0)).unwrap();
    }

    open_menu(&mut menu, &mut config, MenuEntry::Mist);
    menu.handle(select(), &mut config, NOON); // ADD with all slots taken

    assert!(matches!(
        menu.state(),
        MenuState::Event { step: EventStep::Full, .. }
    ));
    assert_eq!(config.mist.count(), MAX_TRIGGERS);

    // Any press acknowledges and lands back in setup; nothing was lost.
    menu.handle(adjust(), &mut config, NOON);
    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Mist });
    assert_eq!(config.mist.count(), MAX_TRIGGERS);
}

// ── Clock and save ────────────────────────────────────────────

#[test]
fn clock_commit_requests_a_time_set() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();

    open_menu(&mut menu, &mut config, MenuEntry::Clock);
    // Editor seeds from `now` (12:00).
    let effect = dial_time(&mut menu, &mut config, NOON, TimeOfDay::new(6, 45));

    assert_eq!(effect, Some(MenuEffect::SetTime(TimeOfDay::new(6, 45))));
    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Clock });
}

#[test]
fn save_effect_persists_through_the_eeprom() {
    let mut menu = Menu::forced_setup();
    let mut config = Configuration::default();
    config.lamps[2].enabled = true;
    config.lamps[2].on_at = TimeOfDay::new(5, 15);

    for _ in 0..5 {
        menu.handle(adjust(), &mut config, NOON); // walk to SAVE
    }
    let effect = menu.handle(select(), &mut config, NOON);
    assert_eq!(effect, Some(MenuEffect::Save));
    assert_eq!(menu.state(), MenuState::Setup { entry: MenuEntry::Save });

    // Execute the effect the way the menu task would.
    let mut eeprom = MemEeprom::new();
    storage::save(&config, &mut eeprom).unwrap();
    match storage::load(&eeprom).unwrap() {
        LoadOutcome::Stored(loaded) => assert_eq!(loaded, config),
        LoadOutcome::Seeded(_) => panic!("save did not persist"),
    }
}

// ── Rendering ─────────────────────────────────────────────────

#[test]
fn time_fields_render_zero_padded_with_focus_marker() {
    let mut menu = Menu::new();
    let mut config = Configuration::default();
    let mut display = RecordingDisplay::new();

    open_menu(&mut menu, &mut config, MenuEntry::Clock);
    menu.render(&config, TimeOfDay::new(7, 5), &mut display);

    assert!(display.rows.iter().any(|row| row.contains("07:05")));
    assert_eq!(display.rects.len(), 1); // one focus marker
}

#[test]
fn off_state_renders_nothing() {
    let menu = Menu::new();
    let config = Configuration::default();
    let mut display = RecordingDisplay::new();

    menu.render(&config, NOON, &mut display);
    assert!(display.rows.is_empty());
}

// ── Classifier through the mailbox ────────────────────────────

#[test]
fn classifier_feeds_the_single_slot_mailbox() {
    let mut select_btn = ButtonClassifier::new(Button::Select);
    let mut adjust_btn = ButtonClassifier::new(Button::Adjust);

    // A short Select press lands in the slot.
    for _ in 0..3 {
        if let Some(event) = select_btn.poll(true) {
            events::publish(event);
        }
    }
    if let Some(event) = select_btn.poll(false) {
        events::publish(event);
    }

    // Before the menu consumes it, a short Adjust press overwrites it.
    for _ in 0..2 {
        if let Some(event) = adjust_btn.poll(true) {
            events::publish(event);
        }
    }
    if let Some(event) = adjust_btn.poll(false) {
        events::publish(event);
    }

    // The consumer sees only the most recent press, then an empty slot.
    assert_eq!(
        events::take(),
        Some(PressEvent::new(Button::Adjust, PressKind::Short))
    );
    assert_eq!(events::take(), None);
}
