//! Board-agnostic core logic for the Quill pen plotter
//!
//! This crate contains the motion pipeline without any hardware
//! dependencies:
//!
//! - Hardware abstraction traits (step/direction lines, pulse timer, pen)
//! - CoreXY kinematics and trapezoidal ramp planning
//! - Step-pulse scheduler tick
//! - Motion executor decisions
//! - Kill switch debouncing and the latched kill flag
//! - Machine configuration and its parser

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod executor;
pub mod motion;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod traits;
