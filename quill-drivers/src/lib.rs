//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in quill-core on top of `embedded-hal` 1.0:
//!
//! - Step and direction lines (A4988/DRV8825 style drivers)
//! - Hobby servo pen lift
//! - HD44780 character LCD behind a PCF8574 I2C backpack

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod pen;
pub mod stepper;
