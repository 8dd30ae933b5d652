//! GPIO / peripheral pin assignments for the vivarium controller board.
//!
//! Single source of truth — every task and adapter references this module
//! rather than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Front-panel buttons (momentary, external pull-up, active LOW)
// ---------------------------------------------------------------------------

/// Select button — advances / commits the current menu field.
pub const BTN_SELECT_GPIO: i32 = 6;
/// Adjust button — cycles the current menu field's value.
pub const BTN_ADJUST_GPIO: i32 = 7;
/// Hold-feedback LED — lit while a button is held past the long threshold.
pub const HOLD_LED_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Switched loads (relay board inputs, active LOW)
// ---------------------------------------------------------------------------

/// Grow lamp relays, channels 1–3.
pub const LAMP_GPIOS: [i32; 3] = [16, 17, 18];
/// Irrigation valve / pump relay.
pub const PUMP_GPIO: i32 = 21;
/// Misting head relay.
pub const MIST_GPIO: i32 = 33;
/// Air bubbler relay.
pub const BUBBLE_GPIO: i32 = 34;
/// Display backlight — follows the "any lamp active" aggregate.
pub const BACKLIGHT_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// I²C bus (DS3231 RTC, AT24C32 EEPROM, HD44780 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;

/// DS3231 real-time clock, 7-bit address.
pub const RTC_I2C_ADDR: u8 = 0x68;
/// AT24C32 EEPROM (piggybacked on the RTC module), 7-bit address.
pub const EEPROM_I2C_ADDR: u8 = 0x57;
/// PCF8574 backpack behind the 16×2 character panel, 7-bit address.
pub const DISPLAY_I2C_ADDR: u8 = 0x27;
