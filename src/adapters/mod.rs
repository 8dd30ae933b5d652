//! Board adapters behind the port traits in [`crate::ports`].
//!
//! Every adapter is dual-target: on `target_os = "espidf"` it drives the
//! real peripheral (the RTC, EEPROM and display panel share one I²C bus);
//! elsewhere it backs the same trait with an in-memory simulation so the
//! task loops and tests run on the host unchanged.

pub mod display;
pub mod eeprom;
pub mod gpio;
pub mod rtc;

#[cfg(target_os = "espidf")]
pub mod board;

/// The I²C bus shared by the RTC, EEPROM and display backpack.
#[cfg(target_os = "espidf")]
pub type SharedI2c =
    std::rc::Rc<core::cell::RefCell<esp_idf_hal::i2c::I2cDriver<'static>>>;
