//! Pen lift actuator

/// Angular pen actuator (hobby servo)
pub trait PenActuator {
    /// Drive the actuator to an angle in degrees (0-180)
    ///
    /// Values above 180 are clamped by the implementation.
    fn set_angle(&mut self, angle: u8);

    /// Last commanded angle
    fn angle(&self) -> u8;
}
