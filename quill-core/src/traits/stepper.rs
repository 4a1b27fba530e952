//! Step/direction motor capabilities
//!
//! The two CoreXY motors are driven open-loop through step and direction
//! lines. Direction lines are set by the motion executor between moves; step
//! lines are pulsed from the step-pulse scheduler at interrupt priority, so
//! the two halves are separate traits and can be owned by different tasks.

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation
    Clockwise,
    /// Counter-clockwise rotation
    CounterClockwise,
}

impl Direction {
    /// Direction for a signed motor displacement
    ///
    /// Non-negative displacements turn the motor counter-clockwise.
    pub fn for_delta(delta: i32) -> Self {
        if delta >= 0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }
}

/// One of the two CoreXY belt motors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motor {
    /// Motor A (moves along X + Y)
    A,
    /// Motor B (moves along Y - X)
    B,
}

impl Motor {
    /// The other motor of the pair
    pub fn other(self) -> Self {
        match self {
            Motor::A => Motor::B,
            Motor::B => Motor::A,
        }
    }
}

/// Step line output for both motors
///
/// Called from interrupt context: implementations must not block beyond the
/// minimum pulse width of the driver chip.
pub trait StepPulse {
    /// Emit one step pulse on the given motor
    fn pulse(&mut self, motor: Motor);
}

/// Direction line output for both motors
pub trait DirectionControl {
    /// Set the rotation direction of a motor
    ///
    /// Only called while the pulse generator is stopped.
    fn set_direction(&mut self, motor: Motor, dir: Direction);
}

/// Periodic pulse generator ("load next pulse period")
///
/// Periods are timer ticks; smaller is faster. Methods take `&self` because
/// the generator is shared between the executor (start), the scheduler
/// (reprogram, stop) and the kill switch (stop).
pub trait PulseTimer {
    /// Program the period used for the next tick
    fn set_period(&self, period: u32);

    /// Start periodic ticking with the programmed period
    fn start(&self);

    /// Stop ticking; a tick already in progress completes
    fn stop(&self);

    /// Check if the generator is running
    fn is_running(&self) -> bool;
}
