//! Motion executor
//!
//! Decision logic of the task that pulls motion commands off the queue. The
//! task itself lives in the firmware and owns the queue, the timer and the
//! pen; this type tells it what to do at each point of the loop:
//!
//! ```text
//!           ┌──────────── kill flag set ───────────┐
//!           ▼                                      │
//!   on_killed ──▶ "stopped", wait, retry           │
//!                                                  │
//!   receive (bounded) ── timeout ──▶ on_idle ──▶ "finished" once
//!           │
//!           ▼
//!   begin(cmd, kill) ──▶ status, pen, settle, arm scheduler
//!           │
//!           ▼
//!   wait for outcome ──▶ finish(outcome) ──▶ "stopped" on abort
//! ```

use quill_protocol::PenState;

use crate::config::PenConfig;
use crate::motion::MotionCommand;
use crate::safety::KillFlag;
use crate::scheduler::ExecutionState;
use crate::state::Status;
use crate::traits::Direction;

/// How a move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// All steps emitted
    Completed,
    /// Stopped by the kill switch
    Aborted,
}

/// Stepping half of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveSetup {
    /// Direction for motor A, set before arming
    pub dir_a: Direction,
    /// Direction for motor B, set before arming
    pub dir_b: Direction,
    /// Fresh scheduler state to hand over
    pub state: ExecutionState,
}

/// Actions for one dequeued command, in order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MovePlan {
    /// Status to publish before anything else
    pub status: Option<Status>,
    /// Pen angle to drive to
    pub pen_angle: Option<u8>,
    /// Wait after the pen move (ms)
    pub settle_ms: u32,
    /// Axis motion, if the command moves the head
    pub stepping: Option<MoveSetup>,
}

/// Executor state machine
#[derive(Debug, Clone)]
pub struct MotionExecutor {
    pen: PenConfig,
    is_active: bool,
}

impl MotionExecutor {
    pub fn new(pen: PenConfig) -> Self {
        Self {
            pen,
            is_active: false,
        }
    }

    /// A command stream is in progress
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Servo angle for a pen state
    pub fn pen_angle(&self, z: PenState) -> u8 {
        if z.is_up() {
            self.pen.up_angle
        } else {
            self.pen.down_angle
        }
    }

    /// Kill flag is set: nothing may be dequeued
    pub fn on_killed(&mut self) -> Status {
        self.is_active = false;
        Status::Stopped
    }

    /// Queue receive timed out
    ///
    /// Reports "finished" once per command stream.
    pub fn on_idle(&mut self, kill: &KillFlag) -> Option<Status> {
        if self.is_active && !kill.is_tripped() {
            self.is_active = false;
            Some(Status::Finished)
        } else {
            None
        }
    }

    /// A command was dequeued
    ///
    /// With the kill flag set the command is not acted on: the plan is empty
    /// and carries no status, so "stopped" and the parked pen stay in place.
    pub fn begin(&mut self, cmd: &MotionCommand, kill: &KillFlag) -> MovePlan {
        if kill.is_tripped() {
            self.is_active = false;
            return MovePlan::default();
        }

        let status = if self.is_active {
            None
        } else {
            self.is_active = true;
            Some(Status::Moving)
        };

        let (pen_angle, settle_ms) = if cmd.z_action {
            (Some(self.pen_angle(cmd.z_state)), self.pen.settle_ms)
        } else {
            (None, 0)
        };

        let stepping = cmd.has_motion().then(|| MoveSetup {
            dir_a: cmd.dir_a,
            dir_b: cmd.dir_b,
            state: ExecutionState::from_command(cmd),
        });

        MovePlan {
            status,
            pen_angle,
            settle_ms,
            stepping,
        }
    }

    /// The scheduler reported an outcome
    ///
    /// Returns "stopped" if the move was aborted or the kill flag is set;
    /// the flag is re-asserted in that case.
    pub fn finish(&mut self, outcome: MoveOutcome, kill: &KillFlag) -> Option<Status> {
        if outcome == MoveOutcome::Aborted || kill.is_tripped() {
            kill.trip();
            self.is_active = false;
            Some(Status::Stopped)
        } else {
            None
        }
    }
}
