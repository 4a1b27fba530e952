//! Motion planning
//!
//! CoreXY kinematics, line rasterization setup and the trapezoidal ramp.

pub mod command;
pub mod kinematics;
pub mod planner;
pub mod ramp;

pub use command::MotionCommand;
pub use kinematics::{corexy, mm_to_steps, LineSetup, MotorDeltas};
pub use planner::{MotionPlanner, Position};
pub use ramp::{RampPhase, RampProfile};
