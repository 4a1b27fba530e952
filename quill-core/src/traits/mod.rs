//! Hardware abstraction traits
//!
//! These traits define the interface between the motion pipeline
//! and hardware-specific implementations.

pub mod pen;
pub mod stepper;

pub use pen::PenActuator;
pub use stepper::{Direction, DirectionControl, Motor, PulseTimer, StepPulse};
