//! Serial link protocol for the Quill plotter
//!
//! The host streams one coordinate record per text line over the UART. The
//! plotter answers with a single flow-control byte each time a move begins
//! executing, so the host can pace its output against the 1-slot command
//! queue on the controller.
//!
//! ```text
//! host  ──  "x:10 y:20 z:0\n"  ──▶  plotter
//! host  ◀──        0xBB         ──  plotter   (move started)
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod line;
pub mod record;

pub use line::{Line, LineBuffer, LineError, MAX_LINE_LEN};
pub use record::{parse_record, CoordinateRecord, PenState, RecordError};

/// Byte sent to the host when a motion command starts executing
pub const FLOW_CONTROL_TOKEN: u8 = 0xBB;
