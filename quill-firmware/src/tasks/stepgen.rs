//! Step-pulse task
//!
//! Runs on the high-priority interrupt executor. Each armed move is ticked
//! by the step timer until the scheduler reports completion or abort.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Delay;

use quill_core::executor::MoveOutcome;
use quill_core::scheduler::{tick, TickOutcome};
use quill_drivers::stepper::StepLines;

use crate::channels::{ARM_SIGNAL, KILL_FLAG, MOVE_SIGNAL, STEP_TIMER};

/// Step-pulse task
#[embassy_executor::task]
pub async fn stepgen_task(mut steps: StepLines<Output<'static>, Delay>) {
    info!("Step-pulse task started");

    loop {
        let mut state = ARM_SIGNAL.wait().await;
        let mut outcome = MoveOutcome::Aborted;

        let self_stopped = STEP_TIMER
            .run_until_stopped(|| match tick(&mut state, &mut steps, &KILL_FLAG) {
                TickOutcome::Continue(period) => Some(period),
                TickOutcome::Done => {
                    outcome = MoveOutcome::Completed;
                    None
                }
                TickOutcome::Aborted => None,
            })
            .await;

        trace!("Move ended at step {}/{}", state.current_step, state.max_steps);

        // When stopped from outside, the kill switch reports the abort
        if self_stopped {
            MOVE_SIGNAL.signal(outcome);
        }
    }
}
