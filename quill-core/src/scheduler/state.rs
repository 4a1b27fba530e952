//! Per-move scheduler state

use crate::motion::{MotionCommand, RampPhase, RampProfile};
use crate::traits::Motor;

/// State of the move being executed
///
/// Built from a [`MotionCommand`] at move start and moved into the
/// scheduler; the executor only sees it again after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExecutionState {
    pub max_steps: u32,
    pub min_steps: u32,
    /// Bresenham error accumulator
    pub error: i32,
    pub is_a_master: bool,
    /// Ticks executed so far
    pub current_step: u32,
    pub ramp: RampProfile,
}

impl ExecutionState {
    /// Fresh state for a command
    ///
    /// The ramp windows are clamped again here, so hand-built commands with
    /// an oversized acceleration window still run a well-formed trapezoid.
    pub fn from_command(cmd: &MotionCommand) -> Self {
        Self {
            max_steps: cmd.max_steps,
            min_steps: cmd.min_steps,
            error: cmd.error,
            is_a_master: cmd.is_a_master,
            current_step: 0,
            ramp: cmd.ramp().clamped(cmd.max_steps),
        }
    }

    /// Current ramp phase
    pub fn phase(&self) -> RampPhase {
        self.ramp.phase(self.current_step, self.max_steps)
    }

    /// Period for the first tick
    pub fn initial_period(&self) -> u32 {
        self.ramp.start_period
    }

    /// Motor that steps on every tick
    pub fn master(&self) -> Motor {
        if self.is_a_master {
            Motor::A
        } else {
            Motor::B
        }
    }

    /// All ticks have run
    pub fn is_done(&self) -> bool {
        self.current_step >= self.max_steps
    }
}
