//! Serial listener task
//!
//! Assembles UART bytes into lines and turns them into coordinate records.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use quill_protocol::{parse_record, LineBuffer};

use crate::channels::COMMAND_CHANNEL;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Serial listener task
///
/// Blocks on the 1-slot command queue while the planner is busy, which
/// backs pressure up into the UART buffer.
#[embassy_executor::task]
pub async fn listener_task(mut rx: BufferedUartRx) {
    info!("Serial listener started");

    let mut lines = LineBuffer::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            match lines.feed(byte) {
                Ok(Some(line)) => match parse_record(&line) {
                    Ok(record) => {
                        debug!("Record: x={} y={} z={}", record.x, record.y, record.z);
                        COMMAND_CHANNEL.send(record).await;
                    }
                    Err(e) => {
                        warn!("Dropping line '{}': {:?}", line.as_str(), e);
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!("Line error: {:?}", e);
                }
            }
        }
    }
}
