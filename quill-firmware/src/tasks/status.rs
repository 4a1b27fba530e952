//! Status display task

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;

use quill_core::state::Status;
use quill_drivers::display::Lcd1602;

use crate::channels::STATUS_SIGNAL;

/// Status LCD on I2C0
pub type StatusLcd = Lcd1602<I2c<'static, I2C0, Async>, Delay>;

/// Status row
const STATUS_ROW: u8 = 0;

/// Status task - mirrors the latest status onto the LCD
#[embassy_executor::task]
pub async fn status_task(mut lcd: StatusLcd) {
    info!("Status task started");

    if let Err(e) = lcd.init().await {
        error!("LCD init failed: {:?}", e);
    }

    let mut shown: Option<Status> = None;

    loop {
        let status = STATUS_SIGNAL.wait().await;
        if shown == Some(status) {
            continue;
        }

        debug!("Status: {}", status.as_str());
        match lcd.write_row(STATUS_ROW, &status.padded()).await {
            Ok(()) => shown = Some(status),
            Err(e) => warn!("LCD write failed: {:?}", e),
        }
    }
}
