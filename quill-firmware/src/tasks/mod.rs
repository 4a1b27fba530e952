//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! `stepgen` and `kill_switch` run on the high-priority interrupt executor;
//! everything else runs in thread mode.

pub mod executor;
pub mod flow;
pub mod kill_switch;
pub mod listener;
pub mod planner;
pub mod status;
pub mod stepgen;

pub use executor::executor_task;
pub use flow::flow_task;
pub use kill_switch::kill_switch_task;
pub use listener::listener_task;
pub use planner::planner_task;
pub use status::status_task;
pub use stepgen::stepgen_task;
