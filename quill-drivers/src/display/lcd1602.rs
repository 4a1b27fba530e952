//! HD44780 16x2 character LCD over a PCF8574 I2C backpack
//!
//! The backpack exposes the LCD in 4-bit mode. Each expander byte carries
//! one data nibble plus the control lines:
//!
//! ```text
//! bit  7  6  5  4  3   2  1   0
//!      D7 D6 D5 D4 BL  E  RW  RS
//! ```
//!
//! A nibble is latched on the falling edge of E, so every nibble is sent as
//! two expander writes: once with E high, once with E low.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Default PCF8574 backpack address
pub const PCF8574_ADDR: u8 = 0x27;

/// Characters per row
pub const LCD_COLUMNS: usize = 16;

/// Number of rows
pub const LCD_ROWS: u8 = 2;

const RS: u8 = 1 << 0;
const EN: u8 = 1 << 2;
const BACKLIGHT: u8 = 1 << 3;

/// HD44780 instructions
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const RETURN_HOME: u8 = 0x02;
    pub const ENTRY_MODE_INC: u8 = 0x06;
    pub const DISPLAY_OFF: u8 = 0x08;
    pub const DISPLAY_ON: u8 = 0x0C;
    pub const FUNCTION_4BIT_2LINE: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError {
    /// I2C transfer failed
    I2c,
    /// Row outside the display
    InvalidRow,
}

/// Register select for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Register {
    Command,
    Data,
}

/// Expander bytes for one full byte transfer (high nibble first)
fn byte_frames(byte: u8, register: Register, backlight: bool) -> [u8; 4] {
    let mut ctrl = if backlight { BACKLIGHT } else { 0 };
    if register == Register::Data {
        ctrl |= RS;
    }
    let high = (byte & 0xF0) | ctrl;
    let low = ((byte << 4) & 0xF0) | ctrl;
    [high | EN, high, low | EN, low]
}

/// Expander bytes for a single nibble during the 8-bit to 4-bit handshake
fn nibble_frames(nibble: u8, backlight: bool) -> [u8; 2] {
    let ctrl = if backlight { BACKLIGHT } else { 0 };
    let data = (nibble & 0xF0) | ctrl;
    [data | EN, data]
}

/// DDRAM address of a row/column position
fn ddram_address(row: u8, col: u8) -> u8 {
    0x40 * (row % LCD_ROWS) + (col % LCD_COLUMNS as u8)
}

/// 16x2 character LCD
pub struct Lcd1602<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    backlight: bool,
}

impl<I2C: I2c, D: DelayNs> Lcd1602<I2C, D> {
    /// Create a driver for the display at `address`
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            backlight: true,
        }
    }

    /// Run the power-on initialization sequence
    pub async fn init(&mut self) -> Result<(), LcdError> {
        self.delay.delay_ms(40).await;

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x30).await?;
        self.delay.delay_ms(5).await;
        self.write_nibble(0x30).await?;
        self.delay.delay_ms(1).await;
        self.write_nibble(0x30).await?;
        self.write_nibble(0x20).await?;

        for instruction in [
            cmd::FUNCTION_4BIT_2LINE,
            cmd::DISPLAY_OFF,
            cmd::CLEAR,
            cmd::ENTRY_MODE_INC,
            cmd::RETURN_HOME,
            cmd::DISPLAY_ON,
        ] {
            self.command(instruction).await?;
        }

        Ok(())
    }

    /// Move the cursor
    pub async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), LcdError> {
        self.command(cmd::SET_DDRAM_ADDR | ddram_address(row, col)).await
    }

    /// Write text at the cursor
    pub async fn write_bytes(&mut self, text: &[u8]) -> Result<(), LcdError> {
        for &c in text {
            self.send(c, Register::Data).await?;
        }
        Ok(())
    }

    /// Overwrite a full row, padding with spaces
    pub async fn write_row(&mut self, row: u8, text: &[u8]) -> Result<(), LcdError> {
        if row >= LCD_ROWS {
            return Err(LcdError::InvalidRow);
        }
        let mut line = [b' '; LCD_COLUMNS];
        let len = text.len().min(LCD_COLUMNS);
        line[..len].copy_from_slice(&text[..len]);

        self.set_cursor(row, 0).await?;
        self.write_bytes(&line).await
    }

    async fn command(&mut self, instruction: u8) -> Result<(), LcdError> {
        self.send(instruction, Register::Command).await?;
        // Clear and home need 1.52 ms, everything else 37 us
        if instruction <= cmd::RETURN_HOME {
            self.delay.delay_ms(2).await;
        }
        Ok(())
    }

    async fn send(&mut self, byte: u8, register: Register) -> Result<(), LcdError> {
        let frames = byte_frames(byte, register, self.backlight);
        self.i2c
            .write(self.address, &frames)
            .await
            .map_err(|_| LcdError::I2c)?;
        self.delay.delay_us(50).await;
        Ok(())
    }

    async fn write_nibble(&mut self, nibble: u8) -> Result<(), LcdError> {
        let frames = nibble_frames(nibble, self.backlight);
        self.i2c
            .write(self.address, &frames)
            .await
            .map_err(|_| LcdError::I2c)
    }
}
