//! On-target board bring-up: I²C bus, pin directions, adapter wiring.

use core::cell::RefCell;
use std::rc::Rc;

use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;

use crate::adapters::display::TextPanel;
use crate::adapters::eeprom::At24Eeprom;
use crate::adapters::gpio::BoardGpio;
use crate::adapters::rtc::RtcAdapter;
use crate::adapters::SharedI2c;
use crate::error::{Error, Result};
use crate::pins;
use crate::ports::{GpioPort, Level};

/// Bring up the I²C bus and every adapter. Pin directions are configured
/// here; outputs start released (high — the relay board is active-low).
pub fn init() -> Result<(BoardGpio, RtcAdapter, TextPanel, At24Eeprom)> {
    let peripherals = Peripherals::take().map_err(|_| Error::Init("peripherals taken"))?;

    let config = I2cConfig::new().baudrate(Hertz(100_000));
    let driver = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8, // pins::I2C_SDA_GPIO
        peripherals.pins.gpio9, // pins::I2C_SCL_GPIO
        &config,
    )
    .map_err(|_| Error::Init("i2c bus"))?;
    let bus: SharedI2c = Rc::new(RefCell::new(driver));

    configure_pins();

    let mut gpio = BoardGpio::new();
    for pin in outputs() {
        gpio.write_level(pin, Level::High);
    }

    Ok((
        gpio,
        RtcAdapter::new(bus.clone()),
        TextPanel::new(bus.clone()),
        At24Eeprom::new(bus),
    ))
}

fn outputs() -> [i32; 7] {
    [
        pins::LAMP_GPIOS[0],
        pins::LAMP_GPIOS[1],
        pins::LAMP_GPIOS[2],
        pins::PUMP_GPIO,
        pins::MIST_GPIO,
        pins::BUBBLE_GPIO,
        pins::BACKLIGHT_GPIO,
    ]
}

fn configure_pins() {
    use esp_idf_svc::sys::{
        gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_OUTPUT,
        gpio_pull_mode_t_GPIO_PULLUP_ONLY, gpio_set_direction, gpio_set_pull_mode,
    };

    for pin in [pins::BTN_SELECT_GPIO, pins::BTN_ADJUST_GPIO] {
        // SAFETY: one-time pin configuration before any task runs.
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
            gpio_set_pull_mode(pin, gpio_pull_mode_t_GPIO_PULLUP_ONLY);
        }
    }

    for pin in outputs().into_iter().chain([pins::HOLD_LED_GPIO]) {
        // SAFETY: one-time pin configuration before any task runs.
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
        }
    }
}
