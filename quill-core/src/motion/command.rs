//! Planned motion command

use quill_protocol::PenState;

use super::kinematics::LineSetup;
use super::ramp::RampProfile;
use crate::traits::Direction;

/// One straight-line move, ready for execution
///
/// Created by the planner and consumed once by the motion executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionCommand {
    /// Steps of the dominant motor
    pub max_steps: u32,
    /// Steps of the subordinate motor
    pub min_steps: u32,
    /// Error accumulator seed (`max_steps / 2`)
    pub error: i32,
    /// Motor A rotation
    pub dir_a: Direction,
    /// Motor B rotation
    pub dir_b: Direction,
    /// Motor A is dominant
    pub is_a_master: bool,
    /// Pen must move before stepping
    pub z_action: bool,
    /// Pen state for this move
    pub z_state: PenState,
    /// Period for the first and last ticks
    pub start_period: u32,
    /// Cruise period
    pub target_period: u32,
    /// Acceleration window length
    pub accel_steps: u32,
    /// Step at which deceleration begins
    pub decel_start_step: u32,
}

impl MotionCommand {
    /// Assemble a command from its line and ramp parts
    pub fn new(line: LineSetup, ramp: RampProfile, z_action: bool, z_state: PenState) -> Self {
        Self {
            max_steps: line.max_steps,
            min_steps: line.min_steps,
            error: line.error,
            dir_a: line.dir_a,
            dir_b: line.dir_b,
            is_a_master: line.is_a_master,
            z_action,
            z_state,
            start_period: ramp.start_period,
            target_period: ramp.target_period,
            accel_steps: ramp.accel_steps,
            decel_start_step: ramp.decel_start_step,
        }
    }

    /// Ramp parameters of this command
    pub fn ramp(&self) -> RampProfile {
        RampProfile {
            start_period: self.start_period,
            target_period: self.target_period,
            accel_steps: self.accel_steps,
            decel_start_step: self.decel_start_step,
        }
    }

    /// The axes move at all
    pub fn has_motion(&self) -> bool {
        self.max_steps > 0
    }
}
