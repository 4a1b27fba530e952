//! Hobby servo pen lift
//!
//! Standard 50 Hz servo frame; the pulse width maps 0-180 degrees linearly
//! onto 500-2500 us.

use embedded_hal::pwm::SetDutyCycle;
use quill_core::traits::PenActuator;

/// PWM frame length (50 Hz)
pub const SERVO_PERIOD_US: u16 = 20_000;

const MIN_PULSE_US: u32 = 500;
const PULSE_RANGE_US: u32 = 2000;
const MAX_ANGLE: u8 = 180;

/// Pulse width for an angle, clamped to 180 degrees
pub fn pulse_width_us(angle: u8) -> u16 {
    let angle = u32::from(angle.min(MAX_ANGLE));
    (MIN_PULSE_US + angle * PULSE_RANGE_US / u32::from(MAX_ANGLE)) as u16
}

/// Servo-driven pen lift on one PWM channel
pub struct ServoPen<PWM> {
    pwm: PWM,
    angle: u8,
}

impl<PWM: SetDutyCycle> ServoPen<PWM> {
    /// Create the pen and move it to `initial_angle`
    pub fn new(pwm: PWM, initial_angle: u8) -> Self {
        let mut pen = Self { pwm, angle: 0 };
        pen.set_angle(initial_angle);
        pen
    }
}

impl<PWM: SetDutyCycle> PenActuator for ServoPen<PWM> {
    fn set_angle(&mut self, angle: u8) {
        let angle = angle.min(MAX_ANGLE);
        if self
            .pwm
            .set_duty_cycle_fraction(pulse_width_us(angle), SERVO_PERIOD_US)
            .is_ok()
        {
            self.angle = angle;
        }
    }

    fn angle(&self) -> u8 {
        self.angle
    }
}
