//! Board GPIO adapter.
//!
//! On ESP-IDF: raw `gpio_*` calls against the pin map in [`crate::pins`].
//! On the host: a pin-state map, inputs idling at the released (high)
//! level.

use crate::ports::{GpioPort, Level};

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

pub struct BoardGpio {
    #[cfg(not(target_os = "espidf"))]
    levels: core::cell::RefCell<HashMap<i32, Level>>,
}

impl BoardGpio {
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            levels: core::cell::RefCell::new(HashMap::new()),
        }
    }
}

#[cfg(target_os = "espidf")]
impl GpioPort for BoardGpio {
    fn read_level(&self, pin: i32) -> Level {
        // SAFETY: plain register read on a pin configured at init.
        if unsafe { esp_idf_svc::sys::gpio_get_level(pin) } == 0 {
            Level::Low
        } else {
            Level::High
        }
    }

    fn write_level(&mut self, pin: i32, level: Level) {
        let raw = u32::from(level == Level::High);
        // SAFETY: plain register write on a pin configured at init.
        unsafe {
            esp_idf_svc::sys::gpio_set_level(pin, raw);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl GpioPort for BoardGpio {
    fn read_level(&self, pin: i32) -> Level {
        *self.levels.borrow().get(&pin).unwrap_or(&Level::High)
    }

    fn write_level(&mut self, pin: i32, level: Level) {
        self.levels.borrow_mut().insert(pin, level);
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn unwritten_pins_idle_released() {
        let gpio = BoardGpio::new();
        assert_eq!(gpio.read_level(6), Level::High);
        assert!(!gpio.read_level(6).is_engaged());
    }

    #[test]
    fn written_levels_read_back() {
        let mut gpio = BoardGpio::new();
        gpio.write_level(21, Level::Low);
        assert!(gpio.read_level(21).is_engaged());
        gpio.write_level(21, Level::High);
        assert!(!gpio.read_level(21).is_engaged());
    }
}
