//! Motion planner task

use defmt::*;
use embassy_sync::channel::TrySendError;

use quill_core::config::MachineConfig;
use quill_core::motion::MotionPlanner;

use crate::channels::{COMMAND_CHANNEL, MOTION_CHANNEL, MOTION_QUEUE_SIZE};

/// Planner task - turns records into motion commands
#[embassy_executor::task]
pub async fn planner_task(config: MachineConfig) {
    info!("Planner task started");

    let mut planner = MotionPlanner::new(&config);

    loop {
        let record = COMMAND_CHANNEL.receive().await;
        let cmd = planner.plan(&record);

        trace!(
            "Planned: max={} min={} a_master={} pen={} accel={}",
            cmd.max_steps,
            cmd.min_steps,
            cmd.is_a_master,
            cmd.z_state,
            cmd.accel_steps
        );

        if let Err(TrySendError::Full(cmd)) = MOTION_CHANNEL.try_send(cmd) {
            // Only reachable if the host ignores flow control
            error!("Motion queue full ({} commands), waiting", MOTION_QUEUE_SIZE);
            MOTION_CHANNEL.send(cmd).await;
        }
    }
}
