//! The cooperative task set.
//!
//! Seven loops share one `edge-executor` on one thread; each owns a private
//! cadence and suspends only at reactor-timer awaits, so task bodies never
//! interleave mid-instruction and the shared state needs no locks:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────────┐
//!  │  edge_executor::LocalExecutor (single thread)                │
//!  │                                                              │
//!  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌───────┐ ┌──────────┐    │
//!  │  │ input  │ │ menu   │ │ clock  │ │ lamps │ │ pump     │    │
//!  │  │ 50ms ⏱ │ │ 200ms ⏱│ │ ~1s ⏱  │ │ 10s ⏱ │ │ 10s ⏱ +  │    │
//!  │  └───┬────┘ └───┬────┘ └───┬────┘ └───┬───┘ │ blocking │    │
//!  │      │          │          │          │     │ burst    │    │
//!  │      ▼          ▼          ▼          ▼     └────┬─────┘    │
//!  │  PRESS_SLOT  Configuration  SoftClock  GPIO ◀────┘          │
//!  │              (menu writes)  (clock     (mist/bubble 10s ⏱)  │
//!  │                             task writes)                    │
//!  └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single writer per field: the input task writes the press slot, the menu
//! task consumes it and writes `Configuration`, the clock task writes the
//! time. Borrows of the shared cell are never held across an await.

use core::cell::RefCell;
use core::time::Duration;

use async_io_mini::Timer;
use log::{info, warn};
use std::rc::Rc;

use crate::clock::SoftClock;
use crate::config::{Configuration, EventSchedule};
use crate::events::{self, Button};
use crate::input::{ButtonClassifier, POLL_PERIOD_MS};
use crate::menu::{Menu, MenuEffect};
use crate::pins;
use crate::ports::{DisplayPort, EepromPort, GpioPort, Level, TimeSourcePort};
use crate::schedule::{self, PumpGate};
use crate::storage;

/// Menu redraw / press-consume period.
pub const MENU_REDRAW_MS: u64 = 200;
/// Clock tick sleep — calibrated against the RTC so local drift stays
/// inside the ±1-minute reconciliation band.
pub const CLOCK_TICK_MS: u64 = 996;
/// Activation evaluator period.
pub const EVAL_PERIOD_MS: u64 = 10_000;

/// State shared between tasks. Exactly one writer task per field.
pub struct Shared {
    pub clock: SoftClock,
    pub config: Configuration,
}

type SharedState = Rc<RefCell<Shared>>;
type SharedCell<T> = Rc<RefCell<T>>;

// ── Input: poll buttons, classify, publish, drive the hold LED ──

async fn input_loop<G: GpioPort>(gpio: SharedCell<G>) {
    let mut select = ButtonClassifier::new(Button::Select);
    let mut adjust = ButtonClassifier::new(Button::Adjust);
    loop {
        {
            let mut gpio = gpio.borrow_mut();
            let select_down = gpio.read_level(pins::BTN_SELECT_GPIO).is_engaged();
            let adjust_down = gpio.read_level(pins::BTN_ADJUST_GPIO).is_engaged();

            if let Some(event) = select.poll(select_down) {
                events::publish(event);
            }
            if let Some(event) = adjust.poll(adjust_down) {
                events::publish(event);
            }

            let held = select.held_past_short() || adjust.held_past_short();
            gpio.write_level(pins::HOLD_LED_GPIO, Level::engaged(held));
        }
        Timer::after(Duration::from_millis(POLL_PERIOD_MS)).await;
    }
}

// ── Clock: one-second tick, reconciled against the RTC ──

async fn clock_loop<R: TimeSourcePort>(shared: SharedState, rtc: SharedCell<R>) {
    loop {
        shared.borrow_mut().clock.tick(&*rtc.borrow());
        Timer::after(Duration::from_millis(CLOCK_TICK_MS)).await;
    }
}

// ── Menu: consume presses, mutate config, execute effects, redraw ──

async fn menu_loop<D, R, E>(
    shared: SharedState,
    mut menu: Menu,
    mut display: D,
    rtc: SharedCell<R>,
    eeprom: SharedCell<E>,
) where
    D: DisplayPort,
    R: TimeSourcePort,
    E: EepromPort,
{
    loop {
        if let Some(press) = events::take() {
            let effect = {
                let mut shared = shared.borrow_mut();
                let now = shared.clock.now();
                menu.handle(press, &mut shared.config, now)
            };
            match effect {
                Some(MenuEffect::Save) => {
                    let shared = shared.borrow();
                    if let Err(e) = storage::save(&shared.config, &mut *eeprom.borrow_mut()) {
                        warn!("Menu: save failed: {e}");
                    }
                }
                Some(MenuEffect::SetTime(time)) => {
                    shared.borrow_mut().clock.set(time, &mut *rtc.borrow_mut());
                }
                None => {}
            }
        }
        {
            let shared = shared.borrow();
            menu.render(&shared.config, shared.clock.now(), &mut display);
        }
        Timer::after(Duration::from_millis(MENU_REDRAW_MS)).await;
    }
}

// ── Lamps + backlight ──

async fn lamp_loop<G: GpioPort>(shared: SharedState, gpio: SharedCell<G>) {
    loop {
        {
            let shared = shared.borrow();
            let now = shared.clock.now();
            let mut gpio = gpio.borrow_mut();
            for (lamp, pin) in shared.config.lamps.iter().zip(pins::LAMP_GPIOS) {
                gpio.write_level(pin, Level::engaged(schedule::lamp_is_active(lamp, now)));
            }
            gpio.write_level(
                pins::BACKLIGHT_GPIO,
                Level::engaged(schedule::any_lamp_active(&shared.config, now)),
            );
        }
        Timer::after(Duration::from_millis(EVAL_PERIOD_MS)).await;
    }
}

// ── Pump: timed burst with the gate in schedule.rs ──

async fn pump_loop<G: GpioPort>(shared: SharedState, gpio: SharedCell<G>) {
    let mut gate = PumpGate::new();
    loop {
        let burst = {
            let shared = shared.borrow();
            gate.fire(&shared.config.pump, shared.clock.now())
        };
        if let Some(run_secs) = burst {
            gpio.borrow_mut()
                .write_level(pins::PUMP_GPIO, Level::engaged(true));
            // The burst deliberately blocks the whole executor: nothing has
            // sub-second latency requirements while the valve is open, and
            // an irrigation in progress must not be cancelled mid-burst.
            std::thread::sleep(Duration::from_secs(u64::from(run_secs)));
            gpio.borrow_mut()
                .write_level(pins::PUMP_GPIO, Level::engaged(false));
            info!("Pump: burst complete");
        }
        Timer::after(Duration::from_millis(EVAL_PERIOD_MS)).await;
    }
}

// ── Mist / bubbler: trigger-window evaluation ──

async fn event_device_loop<G: GpioPort>(
    shared: SharedState,
    gpio: SharedCell<G>,
    pin: i32,
    select: fn(&Configuration) -> &EventSchedule,
) {
    loop {
        {
            let shared = shared.borrow();
            let active = schedule::event_is_active(select(&shared.config), shared.clock.now());
            gpio.borrow_mut().write_level(pin, Level::engaged(active));
        }
        Timer::after(Duration::from_millis(EVAL_PERIOD_MS)).await;
    }
}

// ── Executor entry ──

/// Spawn every loop and drive them forever on the calling thread.
pub fn run<G, R, D, E>(gpio: G, rtc: R, display: D, eeprom: E, shared: Shared, menu: Menu)
where
    G: GpioPort + 'static,
    R: TimeSourcePort + 'static,
    D: DisplayPort + 'static,
    E: EepromPort + 'static,
{
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();

    let shared: SharedState = Rc::new(RefCell::new(shared));
    let gpio = Rc::new(RefCell::new(gpio));
    let rtc = Rc::new(RefCell::new(rtc));
    let eeprom = Rc::new(RefCell::new(eeprom));

    executor.spawn(input_loop(gpio.clone())).detach();
    executor
        .spawn(clock_loop(shared.clone(), rtc.clone()))
        .detach();
    executor
        .spawn(menu_loop(shared.clone(), menu, display, rtc, eeprom))
        .detach();
    executor.spawn(lamp_loop(shared.clone(), gpio.clone())).detach();
    executor.spawn(pump_loop(shared.clone(), gpio.clone())).detach();
    executor
        .spawn(event_device_loop(
            shared.clone(),
            gpio.clone(),
            pins::MIST_GPIO,
            |config| &config.mist,
        ))
        .detach();
    executor
        .spawn(event_device_loop(shared, gpio, pins::BUBBLE_GPIO, |config| {
            &config.bubble
        }))
        .detach();

    info!("Task set running (7 cooperative loops)");

    // The reactor drives the timers while the executor drives the loops;
    // none of them ever completes.
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}
