//! CoreXY kinematics and line rasterization setup
//!
//! Both belts move the head on both axes. For Cartesian deltas `dx`, `dy`
//! (in steps) the motor displacements are:
//!
//! ```text
//! da = dx + dy
//! db = dy - dx
//! ```
//!
//! The motor with the larger displacement is the dominant ("master") motor:
//! it steps on every scheduler tick while the other one steps on the ticks
//! chosen by the integer error accumulator.

use crate::traits::{Direction, Motor};

/// Signed motor displacements for one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorDeltas {
    /// Motor A displacement in steps
    pub da: i32,
    /// Motor B displacement in steps
    pub db: i32,
}

/// Convert Cartesian step deltas to motor step deltas
pub fn corexy(dx: i32, dy: i32) -> MotorDeltas {
    MotorDeltas {
        da: dx + dy,
        db: dy - dx,
    }
}

/// Convert millimetres to whole steps, truncating toward zero
pub fn mm_to_steps(mm: f32, steps_per_mm: f32) -> i32 {
    (mm * steps_per_mm) as i32
}

/// Rasterization parameters derived from motor deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineSetup {
    /// Steps of the dominant motor (one per tick)
    pub max_steps: u32,
    /// Steps of the subordinate motor
    pub min_steps: u32,
    /// Error accumulator seed
    pub error: i32,
    /// Motor A is dominant (ties go to A)
    pub is_a_master: bool,
    /// Motor A direction
    pub dir_a: Direction,
    /// Motor B direction
    pub dir_b: Direction,
}

impl LineSetup {
    /// Build the setup for a pair of motor deltas
    pub fn new(deltas: MotorDeltas) -> Self {
        let abs_a = deltas.da.unsigned_abs();
        let abs_b = deltas.db.unsigned_abs();
        let is_a_master = abs_a >= abs_b;

        let (max_steps, min_steps) = if is_a_master {
            (abs_a, abs_b)
        } else {
            (abs_b, abs_a)
        };

        Self {
            max_steps,
            min_steps,
            error: (max_steps / 2) as i32,
            is_a_master,
            dir_a: Direction::for_delta(deltas.da),
            dir_b: Direction::for_delta(deltas.db),
        }
    }

    /// The motor that steps on every tick
    pub fn master(&self) -> Motor {
        if self.is_a_master {
            Motor::A
        } else {
            Motor::B
        }
    }
}
