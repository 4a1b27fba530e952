//! Pen lift drivers

pub mod servo;

pub use servo::{pulse_width_us, ServoPen, SERVO_PERIOD_US};
