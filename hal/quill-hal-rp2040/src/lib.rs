//! RP2040-specific HAL for the plotter firmware
//!
//! This crate provides the RP2040 side of the quill-core hardware traits:
//!
//! - Step pulse generator driven by the embassy time driver (1 MHz ticks)
//! - Servo PWM slice setup for the pen lift

#![no_std]

pub mod servo;
pub mod step_timer;

pub use servo::{servo_config, servo_output, SERVO_COUNTER_HZ, SYS_CLK_HZ};
pub use step_timer::{StepTimer, TIMER_TICK_HZ};
