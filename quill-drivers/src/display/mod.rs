//! Status display drivers

pub mod lcd1602;

pub use lcd1602::{Lcd1602, LcdError, LCD_COLUMNS, LCD_ROWS, PCF8574_ADDR};
