//! AT24C32 EEPROM adapter (piggybacked on the DS3231 module).
//!
//! `update` is read-compare-write per byte, sparing write cycles when the
//! saved configuration barely changed. The host backend keeps the part
//! image in memory, erased state 0xFF like real silicon.

use crate::ports::{EepromPort, StorageError};

#[cfg(target_os = "espidf")]
use crate::adapters::SharedI2c;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Part capacity in bytes (AT24C32 = 32 kbit).
pub const PART_SIZE: usize = 4096;

/// Datasheet write-cycle time.
#[cfg(target_os = "espidf")]
const WRITE_CYCLE_MS: u64 = 5;

pub struct At24Eeprom {
    #[cfg(target_os = "espidf")]
    bus: SharedI2c,
    #[cfg(not(target_os = "espidf"))]
    cells: core::cell::RefCell<Vec<u8>>,
}

impl At24Eeprom {
    #[cfg(target_os = "espidf")]
    pub fn new(bus: SharedI2c) -> Self {
        Self { bus }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            cells: core::cell::RefCell::new(vec![0xFF; PART_SIZE]),
        }
    }

    fn check_bounds(addr: usize, len: usize) -> Result<(), StorageError> {
        if addr + len > PART_SIZE {
            return Err(StorageError::OutOfBounds);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn read_byte(&self, addr: usize) -> Result<u8, StorageError> {
        use esp_idf_hal::delay::BLOCK;
        let pointer = [(addr >> 8) as u8, addr as u8];
        let mut buf = [0u8; 1];
        self.bus
            .borrow_mut()
            .write_read(pins::EEPROM_I2C_ADDR, &pointer, &mut buf, BLOCK)
            .map_err(|_| StorageError::Bus)?;
        Ok(buf[0])
    }

    #[cfg(target_os = "espidf")]
    fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), StorageError> {
        use esp_idf_hal::delay::BLOCK;
        let frame = [(addr >> 8) as u8, addr as u8, value];
        self.bus
            .borrow_mut()
            .write(pins::EEPROM_I2C_ADDR, &frame, BLOCK)
            .map_err(|_| StorageError::Bus)?;
        std::thread::sleep(core::time::Duration::from_millis(WRITE_CYCLE_MS));
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl EepromPort for At24Eeprom {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        use esp_idf_hal::delay::BLOCK;
        Self::check_bounds(addr, buf.len())?;
        let pointer = [(addr >> 8) as u8, addr as u8];
        self.bus
            .borrow_mut()
            .write_read(pins::EEPROM_I2C_ADDR, &pointer, buf, BLOCK)
            .map_err(|_| StorageError::Bus)
    }

    fn update(&mut self, addr: usize, data: &[u8]) -> Result<(), StorageError> {
        Self::check_bounds(addr, data.len())?;
        for (offset, &byte) in data.iter().enumerate() {
            if self.read_byte(addr + offset)? != byte {
                self.write_byte(addr + offset, byte)?;
            }
        }
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl EepromPort for At24Eeprom {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        Self::check_bounds(addr, buf.len())?;
        let cells = self.cells.borrow();
        buf.copy_from_slice(&cells[addr..addr + buf.len()]);
        Ok(())
    }

    fn update(&mut self, addr: usize, data: &[u8]) -> Result<(), StorageError> {
        Self::check_bounds(addr, data.len())?;
        let mut cells = self.cells.borrow_mut();
        cells[addr..addr + data.len()].copy_from_slice(data);
        Ok(())
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn blank_part_reads_erased() {
        let eeprom = At24Eeprom::new();
        let mut buf = [0u8; 8];
        eeprom.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF; 8]);
    }

    #[test]
    fn update_round_trips() {
        let mut eeprom = At24Eeprom::new();
        eeprom.update(100, b"vivarium").unwrap();

        let mut buf = [0u8; 8];
        eeprom.read(100, &mut buf).unwrap();
        assert_eq!(&buf, b"vivarium");
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut eeprom = At24Eeprom::new();
        let mut buf = [0u8; 16];
        assert_eq!(
            eeprom.read(PART_SIZE - 8, &mut buf),
            Err(StorageError::OutOfBounds)
        );
        assert_eq!(
            eeprom.update(PART_SIZE, &[1]),
            Err(StorageError::OutOfBounds)
        );
    }
}
