//! Machine status reporting

pub mod status;

pub use status::{Status, STATUS_WIDTH};
