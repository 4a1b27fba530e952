//! Trapezoidal pulse-period ramp
//!
//! Speed is shaped by interpolating the timer period linearly between a slow
//! start period and the cruise period:
//!
//! ```text
//! period
//!   start ─┐                              ┌─
//!          │╲                            ╱│
//!          │  ╲                        ╱  │
//!  target ─┼────╲──────────────────────╱──┼─
//!          0   accel            decel_start  max
//! ```
//!
//! The deceleration window mirrors the acceleration window, so the ramp is
//! fully described by `accel_steps` and the move length.

/// Phase of the ramp at a given step count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RampPhase {
    /// Period shrinking from start toward target
    Accel,
    /// Period held at target
    Cruise,
    /// Period growing from target back to start
    Decel,
    /// Move complete
    Done,
}

/// Ramp parameters for one move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampProfile {
    /// Period for the first and last ticks
    pub start_period: u32,
    /// Cruise period
    pub target_period: u32,
    /// Length of the acceleration window (and of the deceleration window)
    pub accel_steps: u32,
    /// Step at which deceleration begins (`max_steps - accel_steps`)
    pub decel_start_step: u32,
}

impl RampProfile {
    /// Plan a ramp for a move of `max_steps`
    ///
    /// The acceleration window is a quarter of the move, capped at
    /// `accel_ceiling` and never more than half the move.
    pub fn new(max_steps: u32, start_period: u32, target_period: u32, accel_ceiling: u32) -> Self {
        let accel_steps = (max_steps / 4).min(accel_ceiling);
        Self {
            start_period,
            target_period,
            accel_steps,
            decel_start_step: max_steps - accel_steps,
        }
        .clamped(max_steps)
    }

    /// Enforce the window invariants for a move of `max_steps`
    ///
    /// `accel_steps <= max_steps / 2` and
    /// `decel_start_step == max_steps - accel_steps`, so the two windows never
    /// overlap and the deceleration start is never negative.
    pub fn clamped(self, max_steps: u32) -> Self {
        let accel_steps = self.accel_steps.min(max_steps / 2);
        Self {
            accel_steps,
            decel_start_step: max_steps - accel_steps,
            ..self
        }
    }

    /// Ramp phase once `step` ticks of a `max_steps` move have run
    pub fn phase(&self, step: u32, max_steps: u32) -> RampPhase {
        if step >= max_steps {
            RampPhase::Done
        } else if step >= self.decel_start_step {
            RampPhase::Decel
        } else if step >= self.accel_steps {
            RampPhase::Cruise
        } else {
            RampPhase::Accel
        }
    }

    /// Period to program after `step` ticks of a `max_steps` move
    pub fn period_at(&self, step: u32, max_steps: u32) -> u32 {
        match self.phase(step, max_steps) {
            RampPhase::Accel => {
                interpolate(self.start_period, self.target_period, step, self.accel_steps)
            }
            RampPhase::Cruise => self.target_period,
            RampPhase::Decel => interpolate(
                self.target_period,
                self.start_period,
                step - self.decel_start_step,
                self.accel_steps,
            ),
            RampPhase::Done => self.start_period,
        }
    }
}

/// Linear interpolation `from -> to` at `num / den`, integer only
fn interpolate(from: u32, to: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return to;
    }
    let from = from as i64;
    let to = to as i64;
    let num = num.min(den) as i64;
    (from + (to - from) * num / den as i64) as u32
}
