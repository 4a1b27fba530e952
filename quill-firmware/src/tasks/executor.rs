//! Motion executor task
//!
//! Pulls one motion command at a time, publishes status, moves the pen and
//! hands the stepping part to the step-pulse task.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{with_timeout, Duration, Timer};

use quill_core::config::MachineConfig;
use quill_core::executor::MotionExecutor;
use quill_core::traits::{DirectionControl, Motor, PenActuator, PulseTimer};
use quill_drivers::stepper::DirLines;
use quill_protocol::FLOW_CONTROL_TOKEN;

use crate::channels::{
    with_pen, ARM_SIGNAL, FLOW_CHANNEL, KILL_FLAG, MOTION_CHANNEL, MOVE_SIGNAL, STATUS_SIGNAL,
    STEP_TIMER,
};

/// Executor task
#[embassy_executor::task]
pub async fn executor_task(mut dirs: DirLines<Output<'static>>, config: MachineConfig) {
    info!("Executor task started");

    let mut executor = MotionExecutor::new(config.pen);
    let idle_timeout = Duration::from_millis(u64::from(config.executor.idle_timeout_ms));
    let killed_poll = Duration::from_millis(u64::from(config.executor.killed_poll_ms));

    loop {
        if KILL_FLAG.is_tripped() {
            STATUS_SIGNAL.signal(executor.on_killed());
            Timer::after(killed_poll).await;
            continue;
        }

        // Wait for a command without taking it, so a kill that lands while
        // waiting leaves the queue untouched.
        if with_timeout(idle_timeout, MOTION_CHANNEL.ready_to_receive())
            .await
            .is_err()
        {
            if let Some(status) = executor.on_idle(&KILL_FLAG) {
                info!("Command stream finished");
                STATUS_SIGNAL.signal(status);
            }
            continue;
        }

        if KILL_FLAG.is_tripped() {
            continue;
        }

        let Ok(cmd) = MOTION_CHANNEL.try_receive() else {
            continue;
        };

        let plan = executor.begin(&cmd, &KILL_FLAG);
        if KILL_FLAG.is_tripped() {
            warn!("Command dropped, kill switch tripped");
            continue;
        }
        if let Some(status) = plan.status {
            info!("Command stream started");
            STATUS_SIGNAL.signal(status);
        }

        if FLOW_CHANNEL.try_send(FLOW_CONTROL_TOKEN).is_err() {
            warn!("Flow-control queue full, token dropped");
        }

        if let Some(angle) = plan.pen_angle {
            debug!("Pen to {} deg", angle);
            with_pen(|pen| pen.set_angle(angle));
            Timer::after_millis(u64::from(plan.settle_ms)).await;
        }

        let Some(setup) = plan.stepping else {
            continue;
        };

        dirs.set_direction(Motor::A, setup.dir_a);
        dirs.set_direction(Motor::B, setup.dir_b);

        MOVE_SIGNAL.reset();
        STEP_TIMER.set_period(setup.state.initial_period());
        ARM_SIGNAL.signal(setup.state);
        STEP_TIMER.start();

        let outcome = MOVE_SIGNAL.wait().await;
        trace!("Move outcome: {:?}", outcome);

        if let Some(status) = executor.finish(outcome, &KILL_FLAG) {
            warn!("Move aborted");
            STATUS_SIGNAL.signal(status);
        }
    }
}
