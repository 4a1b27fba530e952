//! Motion planner
//!
//! Turns coordinate records into motion commands. The planner remembers
//! where the previous command left the head, so every record is an
//! absolute target and every command a relative move.

use quill_protocol::{CoordinateRecord, PenState};

use super::command::MotionCommand;
use super::kinematics::{corexy, mm_to_steps, LineSetup};
use super::ramp::RampProfile;
use crate::config::{KinematicsConfig, MachineConfig, RampConfig};

/// Head position in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Plans moves from the remembered position to each new record
#[derive(Debug, Clone)]
pub struct MotionPlanner {
    kinematics: KinematicsConfig,
    ramp: RampConfig,
    position: Position,
    pen: PenState,
}

impl MotionPlanner {
    /// Create a planner at the origin with the pen up
    pub fn new(config: &MachineConfig) -> Self {
        Self {
            kinematics: config.kinematics,
            ramp: config.ramp,
            position: Position::default(),
            pen: PenState::Up,
        }
    }

    /// Last planned position
    pub fn position(&self) -> Position {
        self.position
    }

    /// Last planned pen state
    pub fn pen(&self) -> PenState {
        self.pen
    }

    /// Clamp a record to the bed
    pub fn clamp(&self, record: &CoordinateRecord) -> CoordinateRecord {
        CoordinateRecord::new(
            record.x.clamp(0.0, self.kinematics.x_max_mm),
            record.y.clamp(0.0, self.kinematics.y_max_mm),
            record.z,
        )
    }

    /// Plan the move to `record` and remember it as the new position
    pub fn plan(&mut self, record: &CoordinateRecord) -> MotionCommand {
        let target = self.clamp(record);
        let spm = self.kinematics.steps_per_mm;

        // Both ends are truncated separately so rounding never accumulates
        let dx = mm_to_steps(target.x, spm) - mm_to_steps(self.position.x_mm, spm);
        let dy = mm_to_steps(target.y, spm) - mm_to_steps(self.position.y_mm, spm);

        let line = LineSetup::new(corexy(dx, dy));

        let target_period = if target.z.is_up() {
            self.ramp.travel_period
        } else {
            self.ramp.drawing_period
        };
        let ramp = RampProfile::new(
            line.max_steps,
            self.ramp.start_period,
            target_period,
            self.ramp.accel_ceiling,
        );

        let z_action = target.z != self.pen;

        self.position = Position {
            x_mm: target.x,
            y_mm: target.y,
        };
        self.pen = target.z;

        MotionCommand::new(line, ramp, z_action, target.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Direction;
    use proptest::prelude::*;

    fn planner() -> MotionPlanner {
        MotionPlanner::new(&MachineConfig::new())
    }

    #[test]
    fn test_starts_at_origin_pen_up() {
        let p = planner();
        assert_eq!(p.position(), Position { x_mm: 0.0, y_mm: 0.0 });
        assert_eq!(p.pen(), PenState::Up);
    }

    #[test]
    fn test_travel_move_along_x() {
        let mut p = planner();
        let cmd = p.plan(&CoordinateRecord::new(100.0, 0.0, PenState::Up));

        assert_eq!(cmd.max_steps, 2000);
        assert_eq!(cmd.min_steps, 2000);
        assert!(cmd.is_a_master);
        assert_eq!(cmd.error, 1000);
        assert_eq!(cmd.dir_a, Direction::CounterClockwise);
        assert_eq!(cmd.dir_b, Direction::Clockwise);
        assert_eq!(cmd.start_period, 4999);
        assert_eq!(cmd.target_period, 999);
        assert_eq!(cmd.accel_steps, 500);
        assert_eq!(cmd.decel_start_step, 1500);
        assert!(!cmd.z_action);
        assert_eq!(p.position(), Position { x_mm: 100.0, y_mm: 0.0 });
    }

    #[test]
    fn test_pen_down_uses_drawing_period() {
        let mut p = planner();
        let cmd = p.plan(&CoordinateRecord::new(10.0, 10.0, PenState::Down));
        assert!(cmd.z_action);
        assert_eq!(cmd.z_state, PenState::Down);
        assert_eq!(cmd.target_period, 1499);

        // Same pen state again: no pen action
        let cmd = p.plan(&CoordinateRecord::new(20.0, 10.0, PenState::Down));
        assert!(!cmd.z_action);
    }

    #[test]
    fn test_moves_are_relative() {
        let mut p = planner();
        p.plan(&CoordinateRecord::new(50.0, 50.0, PenState::Up));
        let cmd = p.plan(&CoordinateRecord::new(50.0, 40.0, PenState::Up));
        // dy = -200 steps: da = -200, db = -200
        assert_eq!(cmd.max_steps, 200);
        assert_eq!(cmd.min_steps, 200);
        assert_eq!(cmd.dir_a, Direction::Clockwise);
        assert_eq!(cmd.dir_b, Direction::Clockwise);
    }

    #[test]
    fn test_same_point_is_pen_only() {
        let mut p = planner();
        let cmd = p.plan(&CoordinateRecord::new(0.0, 0.0, PenState::Down));
        assert!(!cmd.has_motion());
        assert!(cmd.z_action);
        assert_eq!(cmd.accel_steps, 0);
        assert_eq!(cmd.decel_start_step, 0);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let mut p = planner();
        p.plan(&CoordinateRecord::new(999.0, -5.0, PenState::Up));
        assert_eq!(p.position(), Position { x_mm: 250.0, y_mm: 0.0 });
    }

    #[test]
    fn test_full_bed_diagonal_at_step_limit() {
        let mut config = MachineConfig::new();
        config.kinematics.steps_per_mm = 2_500_000.0;
        assert_eq!(config.validate(), Ok(()));

        let mut planner = MotionPlanner::new(&config);
        planner.plan(&CoordinateRecord::new(250.0, 0.0, PenState::Up));
        // -X +Y across the whole bed is the largest motor B displacement
        let cmd = planner.plan(&CoordinateRecord::new(0.0, 380.0, PenState::Up));
        assert!(!cmd.is_a_master);
        assert!(cmd.max_steps > 1_500_000_000);
        assert_eq!(cmd.dir_b, Direction::CounterClockwise);
    }

    proptest! {
        #[test]
        fn prop_clamp_stays_on_bed(x in -1.0e6f32..1.0e6, y in -1.0e6f32..1.0e6) {
            let p = planner();
            let c = p.clamp(&CoordinateRecord::new(x, y, PenState::Up));
            prop_assert!((0.0..=250.0).contains(&c.x));
            prop_assert!((0.0..=380.0).contains(&c.y));
        }

        #[test]
        fn prop_planned_ramp_invariant(
            x in 0.0f32..250.0, y in 0.0f32..380.0,
            x2 in 0.0f32..250.0, y2 in 0.0f32..380.0,
        ) {
            let mut p = planner();
            p.plan(&CoordinateRecord::new(x, y, PenState::Up));
            let cmd = p.plan(&CoordinateRecord::new(x2, y2, PenState::Down));
            prop_assert!(cmd.accel_steps <= (cmd.max_steps / 4).min(1200));
            prop_assert_eq!(cmd.decel_start_step, cmd.max_steps - cmd.accel_steps);
            prop_assert_eq!(cmd.error, (cmd.max_steps / 2) as i32);
            prop_assert!(cmd.min_steps <= cmd.max_steps);
        }
    }
}
