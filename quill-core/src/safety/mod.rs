//! Emergency stop
//!
//! A single latched kill flag, set by the debounced kill switch and read by
//! the step scheduler and the motion executor.

pub mod kill;
pub mod monitor;

pub use kill::KillFlag;
pub use monitor::KillSwitch;
