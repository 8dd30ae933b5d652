//! Vivarium Controller Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  BoardGpio      RtcAdapter     TextPanel     At24Eeprom    │
//! │  (GpioPort)     (TimeSource)   (DisplayPort) (EepromPort)  │
//! │                                                            │
//! │  ────────────── Port Trait Boundary ──────────────────     │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │  Cooperative task set (tasks::run)                   │  │
//! │  │  input · menu · clock · lamps · pump · mist · bubble │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Boot order: platform bring-up, EEPROM configuration load (falling back
//! to seeded defaults plus a forced setup menu), RTC sanity check (fatal
//! when the oscillator is stopped), then the executor runs forever.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use vivarium::adapters::board;
use vivarium::clock::SoftClock;
use vivarium::config::Configuration;
use vivarium::menu::Menu;
use vivarium::ports::{DisplayPort, TimeSourcePort};
use vivarium::storage::{self, LoadOutcome};
use vivarium::tasks::{self, Shared};

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Vivarium Controller v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── Board bring-up ────────────────────────────────────────
    let (gpio, rtc, mut display, eeprom) = match board::init() {
        Ok(adapters) => adapters,
        Err(e) => {
            // No bus means no clock, no storage and no panel: halt.
            error!("Board init failed: {} — halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── Time source sanity ────────────────────────────────────
    // A stopped oscillator means every schedule would run from garbage.
    // Signal the fault and park; there is no retry path.
    if !rtc.is_running() {
        error!("RTC oscillator stopped — halting");
        display.clear();
        display.print_at(0, 0, "CLOCK FAULT");
        display.print_at(0, 1, "CHECK BATTERY");
        loop {
            std::thread::sleep(core::time::Duration::from_secs(1));
        }
    }

    // ── Configuration load ────────────────────────────────────
    let (config, menu) = match storage::load(&eeprom) {
        Ok(LoadOutcome::Stored(config)) => (config, Menu::new()),
        // No valid image: force the user through setup.
        Ok(LoadOutcome::Seeded(config)) => (config, Menu::forced_setup()),
        Err(e) => {
            warn!("EEPROM unreadable ({}), running unsaved defaults", e);
            (Configuration::default(), Menu::forced_setup())
        }
    };

    let shared = Shared {
        clock: SoftClock::from_source(&rtc),
        config,
    };

    info!("System ready. Starting task set.");
    tasks::run(gpio, rtc, display, eeprom, shared, menu);
    Ok(())
}
