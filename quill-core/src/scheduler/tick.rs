//! Scheduler tick

use super::state::ExecutionState;
use crate::safety::KillFlag;
use crate::traits::StepPulse;

/// Result of one scheduler tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Keep ticking; program this period for the next tick
    Continue(u32),
    /// Last step emitted; stop the generator and signal completion
    Done,
    /// Kill flag observed; stop without pulsing
    Aborted,
}

/// Run one rasterization step
///
/// Never blocks and never allocates. The kill flag is checked before any
/// pulse is emitted.
pub fn tick<S: StepPulse>(state: &mut ExecutionState, steps: &mut S, kill: &KillFlag) -> TickOutcome {
    if kill.is_tripped() {
        return TickOutcome::Aborted;
    }
    if state.is_done() {
        return TickOutcome::Done;
    }

    let master = state.master();
    steps.pulse(master);

    state.error -= state.min_steps as i32;
    if state.error < 0 {
        steps.pulse(master.other());
        state.error += state.max_steps as i32;
    }

    state.current_step += 1;

    if state.is_done() {
        TickOutcome::Done
    } else {
        TickOutcome::Continue(state.ramp.period_at(state.current_step, state.max_steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{corexy, LineSetup, MotionCommand, RampPhase, RampProfile};
    use crate::traits::Motor;
    use proptest::prelude::*;
    use quill_protocol::PenState;

    /// Counts pulses per motor
    #[derive(Default)]
    struct PulseCounter {
        a: u32,
        b: u32,
    }

    impl StepPulse for PulseCounter {
        fn pulse(&mut self, motor: Motor) {
            match motor {
                Motor::A => self.a += 1,
                Motor::B => self.b += 1,
            }
        }
    }

    fn command(dx: i32, dy: i32) -> MotionCommand {
        let line = LineSetup::new(corexy(dx, dy));
        let ramp = RampProfile::new(line.max_steps, 4999, 999, 1200);
        MotionCommand::new(line, ramp, false, PenState::Up)
    }

    fn run(state: &mut ExecutionState, steps: &mut PulseCounter, kill: &KillFlag) -> TickOutcome {
        loop {
            match tick(state, steps, kill) {
                TickOutcome::Continue(_) => {}
                outcome => return outcome,
            }
        }
    }

    #[test]
    fn test_pulse_counts_b_master() {
        let mut state = ExecutionState::from_command(&command(-30, 70));
        // da = 40, db = 100: B dominant
        let mut steps = PulseCounter::default();
        assert_eq!(run(&mut state, &mut steps, &KillFlag::new()), TickOutcome::Done);
        assert_eq!(steps.b, 100);
        assert_eq!(steps.a, 40);
        assert_eq!(state.current_step, 100);
    }

    #[test]
    fn test_first_period_follows_ramp() {
        let mut state = ExecutionState::from_command(&command(100, 0));
        assert_eq!(state.initial_period(), 4999);
        let mut steps = PulseCounter::default();
        // max = 100, accel = 25: one step in, period moves toward target
        assert_eq!(tick(&mut state, &mut steps, &KillFlag::new()), TickOutcome::Continue(4839));
    }

    #[test]
    fn test_kill_aborts_without_pulse() {
        let mut state = ExecutionState::from_command(&command(100, 0));
        let mut steps = PulseCounter::default();
        let kill = KillFlag::new();

        for _ in 0..10 {
            tick(&mut state, &mut steps, &kill);
        }
        kill.trip();

        assert_eq!(tick(&mut state, &mut steps, &kill), TickOutcome::Aborted);
        assert_eq!(steps.a, 10);
        assert_eq!(state.current_step, 10);
    }

    #[test]
    fn test_zero_step_move_is_done() {
        let mut state = ExecutionState::from_command(&command(0, 0));
        let mut steps = PulseCounter::default();
        assert_eq!(tick(&mut state, &mut steps, &KillFlag::new()), TickOutcome::Done);
        assert_eq!(steps.a + steps.b, 0);
    }

    #[test]
    fn test_short_hand_built_move_never_reaccelerates() {
        let mut cmd = command(1000, 0);
        // Oversized window, as a hand-built command might carry
        cmd.accel_steps = 1200;
        cmd.decel_start_step = 0;

        let mut state = ExecutionState::from_command(&cmd);
        assert_eq!(state.ramp.accel_steps, 500);
        assert_eq!(state.ramp.decel_start_step, 500);

        let mut steps = PulseCounter::default();
        let kill = KillFlag::new();
        let mut left_accel = false;
        loop {
            let outcome = tick(&mut state, &mut steps, &kill);
            let phase = state.phase();
            if phase != RampPhase::Accel {
                left_accel = true;
            }
            assert!(!(left_accel && phase == RampPhase::Accel));
            if outcome == TickOutcome::Done {
                break;
            }
        }
        assert_eq!(state.phase(), RampPhase::Done);
        assert_eq!(steps.a, 1000);
    }

    proptest! {
        #[test]
        fn prop_exact_pulse_counts(dx in -3_000i32..3_000, dy in -3_000i32..3_000) {
            let cmd = command(dx, dy);
            let mut state = ExecutionState::from_command(&cmd);
            let mut steps = PulseCounter::default();
            prop_assert_eq!(run(&mut state, &mut steps, &KillFlag::new()), TickOutcome::Done);

            let (master, other) = if cmd.is_a_master {
                (steps.a, steps.b)
            } else {
                (steps.b, steps.a)
            };
            prop_assert_eq!(master, cmd.max_steps);
            prop_assert!(other.abs_diff(cmd.min_steps) <= 1);
        }
    }
}
