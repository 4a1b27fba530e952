//! Status tokens shown on the display

/// Width of one display row in characters
pub const STATUS_WIDTH: usize = 16;

/// Machine status, as published to the status sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Booted, waiting for the first command
    Ready,
    /// Executing commands
    Moving,
    /// Command stream drained
    Finished,
    /// Kill switch engaged; needs a reset
    Stopped,
}

impl Status {
    /// Short token for this status
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ready => "ready",
            Status::Moving => "moving",
            Status::Finished => "finished",
            Status::Stopped => "stopped",
        }
    }

    /// Token space-padded to a full display row
    pub fn padded(self) -> [u8; STATUS_WIDTH] {
        let mut row = [b' '; STATUS_WIDTH];
        let text = self.as_str().as_bytes();
        row[..text.len()].copy_from_slice(text);
        row
    }
}
