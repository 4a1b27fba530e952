//! Step-pulse scheduler
//!
//! Runs one Bresenham rasterization step per timer tick and picks the period
//! of the next tick from the trapezoidal ramp. Everything here is pure: the
//! timer driver owns an [`ExecutionState`], calls [`tick`] from its
//! highest-priority context and acts on the returned [`TickOutcome`].

pub mod state;
pub mod tick;

pub use state::ExecutionState;
pub use tick::{tick, TickOutcome};
