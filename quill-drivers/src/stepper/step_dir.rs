//! Step/direction line drivers
//!
//! Generic over `embedded-hal` output pins, so the same code drives A4988,
//! DRV8825 and TMC parts in standalone mode. Direction is high for
//! clockwise rotation.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use quill_core::traits::{Direction, DirectionControl, Motor, StepPulse};

/// Step lines of both motors
///
/// Each pulse holds the line high for `pulse_width_ns`, then drops it.
pub struct StepLines<P, D> {
    step_a: P,
    step_b: P,
    delay: D,
    pulse_width_ns: u32,
}

impl<P: OutputPin, D: DelayNs> StepLines<P, D> {
    /// Create the step lines, driving both low
    pub fn new(mut step_a: P, mut step_b: P, delay: D, pulse_width_ns: u32) -> Self {
        let _ = step_a.set_low();
        let _ = step_b.set_low();
        Self {
            step_a,
            step_b,
            delay,
            pulse_width_ns,
        }
    }
}

impl<P: OutputPin, D: DelayNs> StepPulse for StepLines<P, D> {
    fn pulse(&mut self, motor: Motor) {
        let pin = match motor {
            Motor::A => &mut self.step_a,
            Motor::B => &mut self.step_b,
        };
        // GPIO writes on the supported targets are infallible
        let _ = pin.set_high();
        self.delay.delay_ns(self.pulse_width_ns);
        let _ = pin.set_low();
    }
}

/// Direction lines of both motors
pub struct DirLines<P> {
    dir_a: P,
    dir_b: P,
}

impl<P: OutputPin> DirLines<P> {
    /// Create the direction lines, both set counter-clockwise
    pub fn new(dir_a: P, dir_b: P) -> Self {
        let mut lines = Self { dir_a, dir_b };
        lines.set_direction(Motor::A, Direction::CounterClockwise);
        lines.set_direction(Motor::B, Direction::CounterClockwise);
        lines
    }
}

impl<P: OutputPin> DirectionControl for DirLines<P> {
    fn set_direction(&mut self, motor: Motor, dir: Direction) {
        let pin = match motor {
            Motor::A => &mut self.dir_a,
            Motor::B => &mut self.dir_b,
        };
        let _ = match dir {
            Direction::Clockwise => pin.set_high(),
            Direction::CounterClockwise => pin.set_low(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock pin that records its level and rising edges
    #[derive(Default)]
    struct MockPin {
        high: bool,
        rising_edges: u32,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
            Ok(())
        }
    }

    /// Mock delay that sums requested nanoseconds
    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn test_pulse_targets_one_motor() {
        let mut lines = StepLines::new(
            MockPin::default(),
            MockPin::default(),
            MockDelay::default(),
            2000,
        );

        lines.pulse(Motor::A);
        lines.pulse(Motor::A);
        lines.pulse(Motor::B);

        assert_eq!(lines.step_a.rising_edges, 2);
        assert_eq!(lines.step_b.rising_edges, 1);
        // Lines always end low
        assert!(!lines.step_a.high);
        assert!(!lines.step_b.high);
        assert_eq!(lines.delay.total_ns, 6000);
    }

    #[test]
    fn test_direction_levels() {
        let mut lines = DirLines::new(MockPin::default(), MockPin::default());
        assert!(!lines.dir_a.high);
        assert!(!lines.dir_b.high);

        lines.set_direction(Motor::A, Direction::Clockwise);
        assert!(lines.dir_a.high);
        assert!(!lines.dir_b.high);

        lines.set_direction(Motor::A, Direction::CounterClockwise);
        lines.set_direction(Motor::B, Direction::Clockwise);
        assert!(!lines.dir_a.high);
        assert!(lines.dir_b.high);
    }
}
