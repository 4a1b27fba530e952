//! Servo PWM setup
//!
//! The PWM counter is divided down to 1 MHz so compare values are pulse
//! widths in microseconds, and wraps every 20 000 counts (50 Hz).

use embassy_rp::pwm::{ChannelAPin, Config, Pwm, PwmOutput, Slice};
use embassy_rp::Peri;
use fixed::types::U12F4;

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// PWM counter rate for servo slices
pub const SERVO_COUNTER_HZ: u32 = 1_000_000;

/// Servo frame length in counter ticks
const SERVO_TOP: u16 = 19_999;

/// PWM configuration for a 50 Hz servo frame with 1 us resolution
pub fn servo_config() -> Config {
    let mut config = Config::default();
    config.divider = U12F4::from_num(SYS_CLK_HZ / SERVO_COUNTER_HZ);
    config.top = SERVO_TOP;
    config.compare_a = 0;
    config
}

/// Configure a slice for servo output on its A channel
pub fn servo_output<'d, T: Slice>(
    slice: Peri<'d, T>,
    pin: Peri<'d, impl ChannelAPin<T>>,
) -> Option<PwmOutput<'d>> {
    let pwm = Pwm::new_output_a(slice, pin, servo_config());
    let (a, _) = pwm.split();
    a
}
