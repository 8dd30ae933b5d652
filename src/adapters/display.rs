//! 16×2 character panel adapter (HD44780 behind a PCF8574 I²C backpack).
//!
//! Implements [`DisplayPort`] for the menu. The marker rectangle the menu
//! draws under the field being edited maps to the panel's hardware cursor
//! at that cell; a horizontal rule has no glyph-level equivalent on this
//! panel and is dropped. The host backend keeps a text framebuffer and
//! logs rows as they change, which is what the integration runs watch.

use crate::ports::DisplayPort;

#[cfg(target_os = "espidf")]
use crate::adapters::SharedI2c;
#[cfg(target_os = "espidf")]
use crate::pins;

pub const COLS: u8 = 16;
pub const ROWS: u8 = 2;

// PCF8574 backpack bit map.
#[cfg(target_os = "espidf")]
const BIT_RS: u8 = 0x01;
#[cfg(target_os = "espidf")]
const BIT_EN: u8 = 0x04;
#[cfg(target_os = "espidf")]
const BIT_BACKLIGHT: u8 = 0x08;

pub struct TextPanel {
    #[cfg(target_os = "espidf")]
    bus: SharedI2c,
    #[cfg(not(target_os = "espidf"))]
    frame: [[u8; COLS as usize]; ROWS as usize],
    #[cfg(not(target_os = "espidf"))]
    shown: [[u8; COLS as usize]; ROWS as usize],
}

impl TextPanel {
    #[cfg(target_os = "espidf")]
    pub fn new(bus: SharedI2c) -> Self {
        let mut panel = Self { bus };
        panel.init_controller();
        panel
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            frame: [[b' '; COLS as usize]; ROWS as usize],
            shown: [[b' '; COLS as usize]; ROWS as usize],
        }
    }

    // ── espidf: HD44780 nibble interface ──

    #[cfg(target_os = "espidf")]
    fn init_controller(&mut self) {
        // 4-bit re-sync per the HD44780 datasheet power-up sequence.
        for raw in [0x33u8, 0x32] {
            self.write_raw(raw, false);
        }
        self.command(0x28); // 4-bit, two lines, 5x8 font
        self.command(0x0C); // display on, cursor off
        self.command(0x06); // entry: increment, no shift
        self.command(0x01); // clear
        std::thread::sleep(core::time::Duration::from_millis(2));
    }

    #[cfg(target_os = "espidf")]
    fn command(&mut self, byte: u8) {
        self.write_raw(byte, false);
    }

    #[cfg(target_os = "espidf")]
    fn data(&mut self, byte: u8) {
        self.write_raw(byte, true);
    }

    #[cfg(target_os = "espidf")]
    fn write_raw(&mut self, byte: u8, is_data: bool) {
        let rs = if is_data { BIT_RS } else { 0 };
        for nibble in [byte & 0xF0, byte << 4] {
            let frame = nibble | rs | BIT_BACKLIGHT;
            self.bus_write(frame | BIT_EN);
            self.bus_write(frame);
        }
    }

    #[cfg(target_os = "espidf")]
    fn bus_write(&mut self, byte: u8) {
        use esp_idf_hal::delay::BLOCK;
        if let Err(e) =
            self.bus
                .borrow_mut()
                .write(pins::DISPLAY_I2C_ADDR, &[byte], BLOCK)
        {
            log::warn!("Display: backpack write failed: {e}");
        }
    }

    #[cfg(target_os = "espidf")]
    fn set_cursor(&mut self, col: u8, row: u8) {
        let base = if row == 0 { 0x00 } else { 0x40 };
        self.command(0x80 | (base + col.min(COLS - 1)));
    }
}

#[cfg(target_os = "espidf")]
impl DisplayPort for TextPanel {
    fn clear(&mut self) {
        self.command(0x01);
        std::thread::sleep(core::time::Duration::from_millis(2));
    }

    fn print_at(&mut self, col: u8, row: u8, text: &str) {
        if row >= ROWS {
            return;
        }
        self.set_cursor(col, row);
        for byte in text.bytes().take((COLS - col.min(COLS)) as usize) {
            self.data(byte);
        }
        self.command(0x0C); // plain text leaves the cursor hidden
    }

    fn draw_rect(&mut self, col: u8, row: u8, _width: u8, _height: u8) {
        // The marker rectangle becomes the hardware cursor at that cell.
        if row >= ROWS {
            return;
        }
        self.set_cursor(col, row);
        self.command(0x0E); // display on, cursor on
    }

    fn draw_hline(&mut self, _col: u8, _row: u8, _len: u8) {
        // No glyph-level equivalent on a character panel.
    }
}

#[cfg(not(target_os = "espidf"))]
impl DisplayPort for TextPanel {
    fn clear(&mut self) {
        self.frame = [[b' '; COLS as usize]; ROWS as usize];
    }

    fn print_at(&mut self, col: u8, row: u8, text: &str) {
        if row >= ROWS {
            return;
        }
        let row_idx = row as usize;
        for (i, byte) in text.bytes().enumerate() {
            let col_idx = col as usize + i;
            if col_idx >= COLS as usize {
                break;
            }
            self.frame[row_idx][col_idx] = byte;
        }
        if self.frame[row_idx] != self.shown[row_idx] {
            self.shown[row_idx] = self.frame[row_idx];
            log::debug!(
                "Display[{}]: '{}'",
                row,
                core::str::from_utf8(&self.frame[row_idx]).unwrap_or("?")
            );
        }
    }

    fn draw_rect(&mut self, col: u8, row: u8, width: u8, height: u8) {
        log::debug!("Display: marker at ({col},{row}) {width}x{height}");
    }

    fn draw_hline(&mut self, col: u8, row: u8, len: u8) {
        log::debug!("Display: rule at ({col},{row}) len {len}");
    }
}
