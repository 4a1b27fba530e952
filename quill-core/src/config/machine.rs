//! Machine configuration types
//!
//! Defaults describe the reference plotter: 20 steps/mm belts on a
//! 250 x 380 mm bed, a 1 MHz pulse timer and a hobby servo pen lift.

use super::ConfigError;

/// Largest bed extent in steps along one axis
pub const MAX_AXIS_STEPS: i32 = i32::MAX / 2;

/// Bed geometry and belt resolution
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KinematicsConfig {
    /// Motor steps per millimetre of belt travel
    pub steps_per_mm: f32,
    /// Upper X limit in mm (lower limit is 0)
    pub x_max_mm: f32,
    /// Upper Y limit in mm (lower limit is 0)
    pub y_max_mm: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            steps_per_mm: 20.0,
            x_max_mm: 250.0,
            y_max_mm: 380.0,
        }
    }
}

/// Pulse-period ramp parameters
///
/// Periods are ticks of the 1 MHz step timer; a move steps every
/// `period + 1` microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampConfig {
    /// Slow period used at the start and end of every move
    pub start_period: u32,
    /// Cruise period with the pen up
    pub travel_period: u32,
    /// Cruise period with the pen down
    pub drawing_period: u32,
    /// Upper bound on acceleration (and deceleration) steps
    pub accel_ceiling: u32,
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            start_period: 4999,
            travel_period: 999,
            drawing_period: 1499,
            accel_ceiling: 1200,
        }
    }
}

/// Pen servo positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PenConfig {
    /// Servo angle with the pen lifted
    pub up_angle: u8,
    /// Servo angle with the pen on the paper
    pub down_angle: u8,
    /// Time to let the servo settle before moving the axes (ms)
    pub settle_ms: u32,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            up_angle: 30,
            down_angle: 0,
            settle_ms: 200,
        }
    }
}

/// Step line electrical parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperConfig {
    /// Step pulse high time in nanoseconds (A4988 minimum is 1 us)
    pub pulse_width_ns: u32,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            pulse_width_ns: 2000,
        }
    }
}

/// Kill switch input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KillSwitchConfig {
    /// Minimum separation between accepted edges (ms)
    pub debounce_ms: u32,
}

impl Default for KillSwitchConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

/// Motion executor timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExecutorConfig {
    /// Motion queue wait before the stream is considered finished (ms)
    pub idle_timeout_ms: u32,
    /// Re-check interval while the kill flag is set (ms)
    pub killed_poll_ms: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 100,
            killed_poll_ms: 100,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub kinematics: KinematicsConfig,
    pub ramp: RampConfig,
    pub pen: PenConfig,
    pub stepper: StepperConfig,
    pub kill_switch: KillSwitchConfig,
    pub executor: ExecutorConfig,
}

impl MachineConfig {
    /// Create a configuration with reference machine defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let k = &self.kinematics;
        if !(k.steps_per_mm.is_finite() && k.steps_per_mm > 0.0) {
            return Err(ConfigError::OutOfRange);
        }
        if !(k.x_max_mm.is_finite() && k.x_max_mm > 0.0) {
            return Err(ConfigError::OutOfRange);
        }
        if !(k.y_max_mm.is_finite() && k.y_max_mm > 0.0) {
            return Err(ConfigError::OutOfRange);
        }
        // Bed extent in steps, summed on the motor axes, must fit an i32
        let extent = f64::from(k.x_max_mm.max(k.y_max_mm)) * f64::from(k.steps_per_mm);
        if extent > f64::from(MAX_AXIS_STEPS) {
            return Err(ConfigError::OutOfRange);
        }

        let r = &self.ramp;
        if r.travel_period == 0 || r.drawing_period == 0 {
            return Err(ConfigError::OutOfRange);
        }
        // Ramps must start slower than they cruise
        if r.start_period < r.travel_period || r.start_period < r.drawing_period {
            return Err(ConfigError::OutOfRange);
        }

        if self.pen.up_angle > 180 || self.pen.down_angle > 180 {
            return Err(ConfigError::OutOfRange);
        }

        if self.executor.idle_timeout_ms == 0 || self.executor.killed_poll_ms == 0 {
            return Err(ConfigError::OutOfRange);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_machine() {
        let config = MachineConfig::new();
        assert_eq!(config.kinematics.steps_per_mm, 20.0);
        assert_eq!(config.kinematics.x_max_mm, 250.0);
        assert_eq!(config.kinematics.y_max_mm, 380.0);
        assert_eq!(config.ramp.start_period, 4999);
        assert_eq!(config.ramp.travel_period, 999);
        assert_eq!(config.ramp.drawing_period, 1499);
        assert_eq!(config.ramp.accel_ceiling, 1200);
        assert_eq!(config.pen.up_angle, 30);
        assert_eq!(config.pen.down_angle, 0);
        assert_eq!(config.kill_switch.debounce_ms, 200);
        assert_eq!(config.executor.idle_timeout_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_fast_start() {
        let mut config = MachineConfig::new();
        config.ramp.start_period = 500;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut config = MachineConfig::new();
        config.kinematics.steps_per_mm = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));

        let mut config = MachineConfig::new();
        config.kinematics.x_max_mm = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));
    }

    #[test]
    fn test_validate_rejects_step_overflow() {
        let mut config = MachineConfig::new();
        config.kinematics.steps_per_mm = 10_000_000.0;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));

        // One billion steps on the long axis is still in range
        let mut config = MachineConfig::new();
        config.kinematics.steps_per_mm = 1000.0;
        config.kinematics.y_max_mm = 1_000_000.0;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_servo_angle() {
        let mut config = MachineConfig::new();
        config.pen.up_angle = 200;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));
    }
}
