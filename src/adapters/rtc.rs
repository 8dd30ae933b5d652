//! DS3231 real-time clock adapter.
//!
//! - **`target_os = "espidf"`** — BCD time registers over the shared I²C
//!   bus; the oscillator-stop flag in the status register answers
//!   [`TimeSourcePort::is_running`].
//! - **host** — an `Instant`-anchored simulation that ticks in real time,
//!   for running the firmware loops and tests off-target.

use crate::ports::TimeSourcePort;

#[cfg(target_os = "espidf")]
use crate::adapters::SharedI2c;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
const REG_SECONDS: u8 = 0x00;
#[cfg(target_os = "espidf")]
const REG_STATUS: u8 = 0x0F;
/// Oscillator-stop flag: set while the oscillator is (or has been) halted.
#[cfg(target_os = "espidf")]
const STATUS_OSF: u8 = 0x80;

pub struct RtcAdapter {
    #[cfg(target_os = "espidf")]
    bus: SharedI2c,
    #[cfg(not(target_os = "espidf"))]
    sim: SimState,
}

#[cfg(not(target_os = "espidf"))]
struct SimState {
    anchor: std::time::Instant,
    /// Seconds past midnight at the anchor instant.
    base_secs: u32,
}

impl RtcAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(bus: SharedI2c) -> Self {
        Self { bus }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            sim: SimState {
                anchor: std::time::Instant::now(),
                base_secs: 12 * 3600, // simulated boots land at noon
            },
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_reg(&self, reg: u8) -> u8 {
        use esp_idf_hal::delay::BLOCK;
        let mut buf = [0u8; 1];
        let mut bus = self.bus.borrow_mut();
        if let Err(e) = bus.write_read(pins::RTC_I2C_ADDR, &[reg], &mut buf, BLOCK) {
            log::warn!("RTC: register {reg:#04x} read failed: {e}");
            return 0;
        }
        buf[0]
    }

    #[cfg(target_os = "espidf")]
    fn bcd_to_bin(byte: u8) -> u8 {
        (byte >> 4) * 10 + (byte & 0x0F)
    }

    #[cfg(target_os = "espidf")]
    fn bin_to_bcd(value: u8) -> u8 {
        ((value / 10) << 4) | (value % 10)
    }

    #[cfg(not(target_os = "espidf"))]
    fn secs_of_day(&self) -> u32 {
        (self.sim.base_secs + self.sim.anchor.elapsed().as_secs() as u32) % 86_400
    }
}

#[cfg(target_os = "espidf")]
impl TimeSourcePort for RtcAdapter {
    fn hours(&self) -> u8 {
        // 24-hour mode: mask the 12/24 control bits.
        Self::bcd_to_bin(self.read_reg(REG_SECONDS + 2) & 0x3F)
    }

    fn minutes(&self) -> u8 {
        Self::bcd_to_bin(self.read_reg(REG_SECONDS + 1) & 0x7F)
    }

    fn seconds(&self) -> u8 {
        Self::bcd_to_bin(self.read_reg(REG_SECONDS) & 0x7F)
    }

    fn is_running(&self) -> bool {
        self.read_reg(REG_STATUS) & STATUS_OSF == 0
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) {
        use esp_idf_hal::delay::BLOCK;
        let frame = [
            REG_SECONDS,
            Self::bin_to_bcd(second % 60),
            Self::bin_to_bcd(minute % 60),
            Self::bin_to_bcd(hour % 24),
        ];
        let mut bus = self.bus.borrow_mut();
        if let Err(e) = bus.write(pins::RTC_I2C_ADDR, &frame, BLOCK) {
            log::warn!("RTC: time write failed: {e}");
            return;
        }
        // Writing the time restarts a stopped oscillator; clear the flag.
        let status = {
            let mut buf = [0u8; 1];
            let _ = bus.write_read(pins::RTC_I2C_ADDR, &[REG_STATUS], &mut buf, BLOCK);
            buf[0]
        };
        let _ = bus.write(pins::RTC_I2C_ADDR, &[REG_STATUS, status & !STATUS_OSF], BLOCK);
    }
}

#[cfg(not(target_os = "espidf"))]
impl TimeSourcePort for RtcAdapter {
    fn hours(&self) -> u8 {
        (self.secs_of_day() / 3600) as u8
    }

    fn minutes(&self) -> u8 {
        (self.secs_of_day() / 60 % 60) as u8
    }

    fn seconds(&self) -> u8 {
        (self.secs_of_day() % 60) as u8
    }

    fn is_running(&self) -> bool {
        true
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) {
        self.sim.anchor = std::time::Instant::now();
        self.sim.base_secs =
            u32::from(hour % 24) * 3600 + u32::from(minute % 60) * 60 + u32::from(second % 60);
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_reports_set_time() {
        let mut rtc = RtcAdapter::new();
        rtc.set_time(7, 45, 10);
        assert_eq!(rtc.hours(), 7);
        assert_eq!(rtc.minutes(), 45);
        assert!(rtc.is_running());
    }

    #[test]
    fn sim_set_time_wraps_out_of_range() {
        let mut rtc = RtcAdapter::new();
        rtc.set_time(25, 61, 0);
        assert_eq!(rtc.hours(), 1);
        assert_eq!(rtc.minutes(), 1);
    }
}
