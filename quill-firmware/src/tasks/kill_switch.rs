//! Kill switch task
//!
//! Runs on the high-priority interrupt executor so an engaged switch stops
//! the step generator even while thread-mode tasks are busy.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Instant;

use quill_core::config::MachineConfig;
use quill_core::executor::MoveOutcome;
use quill_core::safety::KillSwitch;
use quill_core::traits::{PenActuator, PulseTimer};

use crate::channels::{with_pen, KILL_FLAG, MOVE_SIGNAL, STEP_TIMER};

/// Kill switch task - input is active low with a pull-up
#[embassy_executor::task]
pub async fn kill_switch_task(mut input: Input<'static>, config: MachineConfig) {
    info!("Kill switch armed");

    let mut switch = KillSwitch::new(&config.kill_switch);
    let park_angle = config.pen.up_angle;

    loop {
        input.wait_for_falling_edge().await;

        if !switch.on_edge(Instant::now().as_millis(), &KILL_FLAG) {
            trace!("Kill switch bounce ignored");
            continue;
        }

        STEP_TIMER.stop();
        with_pen(|pen| pen.set_angle(park_angle));
        MOVE_SIGNAL.signal(MoveOutcome::Aborted);

        warn!("Kill switch engaged, motion stopped");
    }
}
